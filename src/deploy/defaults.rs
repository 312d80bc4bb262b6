use serde::Serialize;

pub const DEFAULT_CONFIG_FILE_NAME: &str = "aws-lambda-tools-defaults.json";
pub const BACKUP_CONFIG_FILE_NAME: &str = "aws-lambda-tools-defaults-backup.json";

/// `aws-lambda-tools-defaults.json` content for a NativeAOT deployment.
///
/// Field order is the serialized key order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct DeploymentDefaults {
    #[serde(rename = "Information")]
    pub information: Vec<String>,
    pub profile: String,
    pub region: String,
    pub configuration: String,
    pub function_runtime: String,
    pub function_memory_size: u32,
    pub function_timeout: u32,
    pub function_handler: String,
    pub msbuild_parameters: String,
}

impl Default for DeploymentDefaults {
    fn default() -> Self {
        Self {
            information: vec![
                "This file provides default values for the deployment wizard inside Visual Studio and the AWS Lambda commands added to the .NET Core CLI.".into(),
                "To learn more about the Lambda commands with the .NET Core CLI execute the following command at the command line in the project root directory.".into(),
                "dotnet lambda help".into(),
                "All the command line options for the Lambda command can be specified in this file.".into(),
                "For NativeAOT deployments, build and deploy from an Amazon Linux 2 operating system.".into(),
            ],
            profile: String::new(),
            region: String::new(),
            configuration: "Release".into(),
            function_runtime: "provided.al2".into(),
            function_memory_size: 256,
            function_timeout: 30,
            function_handler: "bootstrap".into(),
            msbuild_parameters: "--self-contained true".into(),
        }
    }
}

impl DeploymentDefaults {
    /// Settings a NativeAOT deployment cannot change, as `key:value` pairs.
    pub fn required_settings(&self) -> Vec<String> {
        vec![
            format!("function-runtime:{}", self.function_runtime),
            format!("function-handler:{}", self.function_handler),
            format!("msbuild-parameters:{}", self.msbuild_parameters),
        ]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
