//! End-to-end conversion of a Lambda project to a NativeAOT executable
//!
//! The pipeline never prints or exits. Everything the user should see comes
//! back in the [`ConversionReport`], and fatal conditions come back as
//! [`ConvertError`].

use crate::analyzers::SignatureAnalyzer;
use crate::codegen::EntryPointPlan;
use crate::config::ConverterConfig;
use crate::core::{ConvertError, HandlerReference, Result};
use crate::deploy;
use crate::packages::{PackageInstaller, PackageOutcome};
use crate::project::{ProjectDescriptor, DESCRIPTOR_EXTENSION};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

pub const OUTPUT_TYPE_PROPERTY: &str = "OutputType";
pub const EXECUTABLE_OUTPUT_TYPE: &str = "exe";
pub const ASSEMBLY_NAME_PROPERTY: &str = "AssemblyName";

/// Inputs gathered from the command line or the interactive prompts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConversionRequest {
    pub descriptor_path: PathBuf,
    /// Qualified handler name. Ignored when the project already builds an executable.
    pub handler: String,
    /// C# file declaring the handler. Ignored when the project already builds an executable.
    pub handler_source: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Outcome of a successful conversion.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConversionReport {
    pub output_type_changed: bool,
    pub assembly_name_changed: bool,
    pub entry_point: Option<PathBuf>,
    pub deployment_defaults: Option<deploy::InstallOutcome>,
    pub notices: Vec<Notice>,
}

impl ConversionReport {
    fn push(&mut self, level: NoticeLevel, message: impl Into<String>) {
        self.notices.push(Notice {
            level,
            message: message.into(),
        });
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Warning)
    }
}

/// The descriptor must be an existing file with a `.csproj` extension.
pub fn validate_descriptor_path(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(ConvertError::user_input(format!(
            "No file found at {}; check that the csproj file exists",
            path.display()
        )));
    }
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(DESCRIPTOR_EXTENSION));
    if !has_extension {
        return Err(ConvertError::user_input(format!(
            "{} does not end with '.{DESCRIPTOR_EXTENSION}'; make sure a valid csproj file was given",
            path.display()
        )));
    }
    Ok(())
}

pub fn convert(
    request: &ConversionRequest,
    config: &ConverterConfig,
    installer: Option<&dyn PackageInstaller>,
) -> Result<ConversionReport> {
    let _span = info_span!("convert", project = %request.descriptor_path.display()).entered();
    validate_descriptor_path(&request.descriptor_path)?;

    let mut report = ConversionReport::default();
    let mut descriptor = ProjectDescriptor::load(&request.descriptor_path)?;
    let project_dir = project_dir(&request.descriptor_path);

    // Resolve the handler before the project is touched, so a bad handler name
    // leaves the csproj as it was.
    let plan = if needs_output_type_change(&descriptor)? {
        Some(plan_entry_point(request)?)
    } else {
        debug!("Project already builds an executable; handler inputs are ignored");
        None
    };

    report.output_type_changed =
        descriptor.set_property(OUTPUT_TYPE_PROPERTY, EXECUTABLE_OUTPUT_TYPE)?;
    report.assembly_name_changed =
        descriptor.set_property(ASSEMBLY_NAME_PROPERTY, &config.project.assembly_name)?;

    match installer {
        Some(installer) if config.packages.enabled => {
            install_packages(installer, &request.descriptor_path, config, &mut report)
        }
        _ => report.push(
            NoticeLevel::Info,
            "Skipped package installation; make sure the ILCompiler and RuntimeSupport packages are referenced",
        ),
    }

    match plan {
        Some(plan) if report.output_type_changed => {
            let path = plan.emit(&project_dir)?;
            report.push(
                NoticeLevel::Info,
                format!("Added entry point {}", path.display()),
            );
            report.entry_point = Some(path);
        }
        _ => report.push(
            NoticeLevel::Info,
            "Project output type was already exe; keeping the existing entry point",
        ),
    }

    let outcome = deploy::install_defaults(&project_dir)?;
    if let Some(warning) = outcome.warning() {
        report.push(NoticeLevel::Warning, warning);
    }
    report.deployment_defaults = Some(outcome);

    report.push(NoticeLevel::Success, "Your function is finished converting!");
    report.push(
        NoticeLevel::Success,
        format!(
            "Build and deploy it from Amazon Linux 2 (a VM, Docker, or WSL works). Deploy with \
             'dotnet lambda deploy-function --function-name MyConvertedNativeFunction --config-file {}'",
            deploy::DEFAULT_CONFIG_FILE_NAME
        ),
    );
    info!("Conversion finished");
    Ok(report)
}

fn needs_output_type_change(descriptor: &ProjectDescriptor) -> Result<bool> {
    let current = descriptor.property(OUTPUT_TYPE_PROPERTY)?;
    Ok(!current.is_some_and(|value| value.eq_ignore_ascii_case(EXECUTABLE_OUTPUT_TYPE)))
}

fn plan_entry_point(request: &ConversionRequest) -> Result<EntryPointPlan> {
    let handler = HandlerReference::parse(&request.handler)?;
    let mut analyzer = SignatureAnalyzer::new()?;
    let signature = analyzer.analyze_file(&request.handler_source, &handler)?;
    Ok(EntryPointPlan::new(&handler, &signature))
}

fn install_packages(
    installer: &dyn PackageInstaller,
    descriptor_path: &Path,
    config: &ConverterConfig,
    report: &mut ConversionReport,
) {
    for package in config.packages.specs() {
        let cause = match installer.add_package(descriptor_path, &package) {
            PackageOutcome::Installed => {
                debug!("Added package {package}");
                continue;
            }
            PackageOutcome::TimedOut { after } => format!("timed out after {}s", after.as_secs()),
            PackageOutcome::Failed { reason } => reason,
        };
        report.push(
            NoticeLevel::Warning,
            format!(
                "Failed to add package {package} to {} ({cause}); please add it manually with '{}'",
                descriptor_path.display(),
                package.manual_command()
            ),
        );
    }
}

fn project_dir(descriptor_path: &Path) -> PathBuf {
    descriptor_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::PackageSpec;
    use indoc::indoc;
    use std::cell::RefCell;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    const LIBRARY_PROJECT: &str = indoc! {r#"
        <Project Sdk="Microsoft.NET.Sdk">
          <PropertyGroup>
            <TargetFramework>net6.0</TargetFramework>
          </PropertyGroup>
        </Project>
    "#};

    const HANDLER: &str = indoc! {r#"
        namespace LambdaToConvert;

        public class Function
        {
            public string MySampleLambdaHandler(string input, ILambdaContext context) => input;
        }
    "#};

    #[derive(Default)]
    struct RecordingInstaller {
        calls: RefCell<Vec<String>>,
        outcome: Option<PackageOutcome>,
    }

    impl PackageInstaller for RecordingInstaller {
        fn add_package(&self, _descriptor: &Path, package: &PackageSpec) -> PackageOutcome {
            self.calls.borrow_mut().push(package.to_string());
            self.outcome.clone().unwrap_or(PackageOutcome::Installed)
        }
    }

    fn project(csproj: &str) -> (TempDir, ConversionRequest) {
        let dir = TempDir::new().unwrap();
        let descriptor_path = dir.path().join("MyProject.csproj");
        let handler_source = dir.path().join("Function.cs");
        fs::write(&descriptor_path, csproj).unwrap();
        fs::write(&handler_source, HANDLER).unwrap();
        let request = ConversionRequest {
            descriptor_path,
            handler: "LambdaToConvert.Function.MySampleLambdaHandler".into(),
            handler_source,
        };
        (dir, request)
    }

    #[test]
    fn test_library_project_is_converted() {
        let (dir, request) = project(LIBRARY_PROJECT);
        let installer = RecordingInstaller::default();

        let report = convert(&request, &ConverterConfig::default(), Some(&installer)).unwrap();

        assert!(report.output_type_changed);
        assert!(report.assembly_name_changed);
        let csproj = fs::read_to_string(&request.descriptor_path).unwrap();
        assert!(csproj.contains(concat!(
            "    <OutputType>exe</OutputType>\n",
            "    <AssemblyName>bootstrap</AssemblyName>\n",
            "  </PropertyGroup>",
        )));

        let entry_point = fs::read_to_string(dir.path().join("EntryPoint.cs")).unwrap();
        assert!(entry_point.contains(
            "(Func<string,ILambdaContext,string>)new LambdaToConvert.Function().MySampleLambdaHandler"
        ));
        assert!(dir.path().join(deploy::DEFAULT_CONFIG_FILE_NAME).exists());
        assert_eq!(
            *installer.calls.borrow(),
            vec!["Microsoft.DotNet.ILCompiler --prerelease", "Amazon.Lambda.RuntimeSupport"]
        );
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_executable_project_skips_entry_point() {
        let csproj = LIBRARY_PROJECT.replace(
            "</TargetFramework>",
            "</TargetFramework>\n    <OutputType>Exe</OutputType>",
        );
        let (dir, mut request) = project(&csproj);
        request.handler = "anything".into();
        request.handler_source = PathBuf::from("anything");

        let report = convert(&request, &ConverterConfig::default(), None).unwrap();

        assert!(!report.output_type_changed);
        assert!(report.entry_point.is_none());
        assert!(!dir.path().join("EntryPoint.cs").exists());
    }

    #[test]
    fn test_missing_handler_leaves_project_untouched() {
        let (_dir, mut request) = project(LIBRARY_PROJECT);
        request.handler = "LambdaToConvert.Function.Missing".into();

        let err = convert(&request, &ConverterConfig::default(), None).unwrap_err();

        assert!(matches!(err, ConvertError::HandlerNotFound { .. }));
        assert_eq!(fs::read_to_string(&request.descriptor_path).unwrap(), LIBRARY_PROJECT);
    }

    #[test]
    fn test_package_failures_are_warnings() {
        let (_dir, request) = project(LIBRARY_PROJECT);
        let installer = RecordingInstaller {
            outcome: Some(PackageOutcome::TimedOut {
                after: Duration::from_secs(60),
            }),
            ..Default::default()
        };

        let report = convert(&request, &ConverterConfig::default(), Some(&installer)).unwrap();

        let warnings: Vec<_> = report.warnings().map(|n| n.message.as_str()).collect();
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].contains("timed out after 60s"));
        assert!(warnings[0]
            .contains("'dotnet add package Microsoft.DotNet.ILCompiler --prerelease'"));
        assert!(report.entry_point.is_some());
    }

    #[test]
    fn test_existing_deployment_defaults_produce_warning() {
        let (dir, request) = project(LIBRARY_PROJECT);
        fs::write(dir.path().join(deploy::DEFAULT_CONFIG_FILE_NAME), "{}").unwrap();

        let report = convert(&request, &ConverterConfig::default(), None).unwrap();

        assert_eq!(report.warnings().count(), 1);
        assert_eq!(
            fs::read_to_string(dir.path().join(deploy::BACKUP_CONFIG_FILE_NAME)).unwrap(),
            "{}"
        );
    }

    #[test]
    fn test_descriptor_path_validation() {
        let dir = TempDir::new().unwrap();
        let wrong_extension = dir.path().join("MyProject.txt");
        fs::write(&wrong_extension, LIBRARY_PROJECT).unwrap();
        let upper = dir.path().join("MyProject.CSPROJ");
        fs::write(&upper, LIBRARY_PROJECT).unwrap();

        assert!(validate_descriptor_path(&wrong_extension).is_err());
        assert!(validate_descriptor_path(&dir.path().join("Missing.csproj")).is_err());
        assert!(validate_descriptor_path(&upper).is_ok());
    }
}
