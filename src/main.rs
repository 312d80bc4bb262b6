use anyhow::{Context, Result};
use aot_converter::cli::{self, Invocation, Prompter};
use aot_converter::commands::{self, ConversionReport, NoticeLevel};
use aot_converter::config;
use aot_converter::core::ConvertError;
use aot_converter::formatting::{ColoredFormatter, OutputFormatter};
use aot_converter::packages::{DotnetCli, PackageInstaller};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);
    let formatter = ColoredFormatter::new(cli.color);

    match run(&cli, &formatter) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", formatter.error(&format!("Error: {e:#}")));
            let code = e
                .downcast_ref::<ConvertError>()
                .map(ConvertError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

fn run(cli: &cli::Cli, formatter: &dyn OutputFormatter) -> Result<()> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    let request = match cli.invocation(&mut prompter)? {
        Invocation::Convert(request) => request,
        Invocation::Declined => {
            let declined = ConvertError::user_input("Consent was not given; nothing was changed");
            return Err(declined.into());
        }
    };

    let config = config::load_config(cli.config.as_deref())?;
    let dotnet = (!cli.skip_packages && config.packages.enabled)
        .then(|| DotnetCli::new(config.packages.timeout()));
    let installer = dotnet.as_ref().map(|dotnet| dotnet as &dyn PackageInstaller);

    let report = commands::convert(&request, &config, installer)
        .with_context(|| format!("Failed to convert {}", request.descriptor_path.display()))?;
    print_report(&report, formatter);
    Ok(())
}

fn print_report(report: &ConversionReport, formatter: &dyn OutputFormatter) {
    for notice in &report.notices {
        match notice.level {
            NoticeLevel::Info => println!("{}", formatter.info(&notice.message)),
            NoticeLevel::Success => println!("{}", formatter.success(&notice.message)),
            NoticeLevel::Warning => eprintln!("{}", formatter.warning(&notice.message)),
        }
    }
}
