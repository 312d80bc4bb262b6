// Shared fixtures for aot-converter integration tests
#![allow(dead_code)]

use aot_converter::ConversionRequest;
use indoc::indoc;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LIBRARY_PROJECT: &str = indoc! {r#"
    <Project Sdk="Microsoft.NET.Sdk">
      <PropertyGroup>
        <TargetFramework>net6.0</TargetFramework>
        <ImplicitUsings>enable</ImplicitUsings>
        <Nullable>enable</Nullable>
      </PropertyGroup>
      <ItemGroup>
        <PackageReference Include="Amazon.Lambda.Core" Version="2.1.0" />
      </ItemGroup>
    </Project>
"#};

pub const INSTANCE_HANDLER: &str = indoc! {r#"
    using Amazon.Lambda.Core;

    namespace LambdaToConvert;

    public class Function
    {
        public string FunctionHandler(string input, ILambdaContext context)
        {
            return input.ToUpper();
        }
    }
"#};

pub const STATIC_ASYNC_HANDLER: &str = indoc! {r#"
    namespace Sample
    {
        public class Function
        {
            public static async Task<APIGatewayProxyResponse> FunctionHandler(
                APIGatewayProxyRequest request,
                ILambdaContext context)
            {
                return await Handle(request);
            }
        }
    }
"#};

/// A throwaway Lambda project with a csproj and one handler source file
pub struct LambdaProject {
    pub dir: TempDir,
    pub csproj: PathBuf,
    pub handler_source: PathBuf,
}

impl LambdaProject {
    pub fn new(csproj: &str, handler_source: &str) -> Self {
        let dir = TempDir::new().expect("create temp dir");
        let project = Self {
            csproj: dir.path().join("LambdaToConvert.csproj"),
            handler_source: dir.path().join("Function.cs"),
            dir,
        };
        fs::write(&project.csproj, csproj).expect("write csproj");
        fs::write(&project.handler_source, handler_source).expect("write handler");
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read(&self, file_name: &str) -> String {
        fs::read_to_string(self.path().join(file_name)).expect("read project file")
    }

    pub fn request(&self, handler: &str) -> ConversionRequest {
        ConversionRequest {
            descriptor_path: self.csproj.clone(),
            handler: handler.to_string(),
            handler_source: self.handler_source.clone(),
        }
    }
}
