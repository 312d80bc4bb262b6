//! Rendering and writing of the `EntryPoint.cs` adapter.

use super::delegate::{DelegateShape, SerializationRegistrations};
use crate::core::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const ENTRY_POINT_FILE_NAME: &str = "EntryPoint.cs";

/// Name of the generated `JsonSerializerContext` subclass.
pub const SERIALIZER_CONTEXT_NAME: &str = "MyCustomJsonSerializerContext";

/// One `[JsonSerializable]` attribute line per registration, in order.
pub fn registration_directives(registrations: &SerializationRegistrations) -> String {
    registrations
        .types()
        .iter()
        .map(|ty| format!("    [JsonSerializable(typeof({ty}))]"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(
    shape: &DelegateShape,
    binding: &str,
    registrations: &SerializationRegistrations,
) -> String {
    format!(
        r#"using Amazon.Lambda.Core;
using Amazon.Lambda.RuntimeSupport;
using Amazon.Lambda.Serialization.SystemTextJson;
using System.Text.Json;
using System.Text.Json.Serialization;

namespace UpdateThisToYourOwnNamespace
{{
    public class EntryPoint
    {{
        /// <summary>
        /// The main entry point for the custom runtime.
        /// </summary>
        private static async Task Main()
        {{
            // If this line fails to build, construct the handler's class with the arguments its constructor needs
            var lambdaBootstrap = LambdaBootstrapBuilder.Create(({delegate}){binding}, new SourceGeneratorLambdaJsonSerializer<{context}>())
                .Build();

            await lambdaBootstrap.RunAsync();
        }}
    }}

    // The handler's input and output types are registered below. Some may be unnecessary (a string return type, for example).
    // Types outside the base class library need their using directives added at the top of this file.
    // Register any other type the function serializes here as well. Reflection-based serialization is unavailable under NativeAOT.
{registrations}
    public partial class {context} : JsonSerializerContext
    {{
        // The System.Text.Json source generator emits serialization code at compile time
        // for every type named in a JsonSerializable attribute on this class.
        // See https://docs.microsoft.com/en-us/dotnet/standard/serialization/system-text-json-source-generation
    }}
}}
"#,
        delegate = shape,
        binding = binding,
        context = SERIALIZER_CONTEXT_NAME,
        registrations = registration_directives(registrations),
    )
}

/// Write `EntryPoint.cs` into `output_dir`, replacing any existing file.
pub fn emit(
    shape: &DelegateShape,
    binding: &str,
    registrations: &SerializationRegistrations,
    output_dir: &Path,
) -> Result<PathBuf> {
    let path = output_dir.join(ENTRY_POINT_FILE_NAME);
    fs::write(&path, render(shape, binding, registrations))
        .map_err(|e| ConvertError::io("Failed to write entry point", &path, e))?;
    info!("Wrote {}", path.display());
    Ok(path)
}
