use clap::Parser;
use imscc_mapper::domain::ports::ConfigProvider;
use imscc_mapper::utils::error::ErrorSeverity;
use imscc_mapper::utils::logger::{self, LogFormat};
use imscc_mapper::utils::validation::Validate;
use imscc_mapper::{CliConfig, CourseParser, ImsccError, LocalStorage, ParseOutcome, TomlConfig};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(LogFormat::from_flag(cli.log_json), cli.verbose);

    tracing::info!("Starting imscc-map");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let result = match cli.config.clone() {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(&path) {
                Ok(mut config) => {
                    // 命令列覆蓋設定
                    if cli.seed.is_some() {
                        config.scoring.seed = cli.seed;
                    }
                    if cli.output_path.is_some() {
                        config.output.path = cli.output_path.clone();
                    }
                    let pretty = cli.pretty || config.pretty_output();
                    let monitor = cli.monitor || config.monitoring_enabled();
                    run(config, &cli, pretty, monitor).await
                }
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone(), &cli, cli.pretty, cli.monitor).await,
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Parse failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run<C: ConfigProvider + Validate>(
    config: C,
    cli: &CliConfig,
    pretty: bool,
    monitor: bool,
) -> Result<(), ImsccError> {
    config.validate().inspect_err(|e| {
        tracing::error!("❌ Configuration validation failed: {}", e);
    })?;

    if monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let output_path = config.output_path().map(str::to_string);
    let parser = CourseParser::new_with_monitoring(config, monitor);
    let input = LocalStorage::new("");
    let outcome = parser.parse_upload(&input, &cli.input).await?;

    match output_path {
        Some(dir) => {
            let storage = LocalStorage::new(dir.clone());
            let file_name = parser.save(&storage, &outcome, pretty).await?;
            tracing::info!("📁 Output saved to: {}/{}", dir, file_name);
        }
        None => {
            let json = if pretty {
                outcome.course.to_json_pretty()?
            } else {
                outcome.course.to_json()?
            };
            println!("{}", json);
        }
    }

    if cli.summary {
        print_summary(&outcome);
    }

    Ok(())
}

fn print_summary(outcome: &ParseOutcome) {
    let course = &outcome.course;
    let breakdown = course.compliance_breakdown();

    eprintln!("📘 {} ({})", course.title, course.code);
    eprintln!(
        "  Modules: {} (via {}, parsed {})",
        course.modules.len(),
        outcome.strategy,
        outcome.parsed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    eprintln!(
        "  Compliant: {}, Partial: {}, Non-compliant: {}",
        breakdown.compliant, breakdown.partial, breakdown.non_compliant
    );
    eprintln!("  Overall QM score: {}%", course.overall_score());
    for module in &course.modules {
        eprintln!(
            "  - [{}] {} ({}%): {} objectives, {} activities, {} assessments",
            module.qm_compliance.status,
            module.name,
            module.qm_compliance.score,
            module.objectives,
            module.activities,
            module.assessments
        );
    }
}
