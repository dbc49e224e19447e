use clap::Parser;
use sleeve_placer::adapters::report;
use sleeve_placer::utils::error::ErrorSeverity;
use sleeve_placer::utils::{logger, validation::Validate};
use sleeve_placer::{
    CliConfig, LocalStorage, ModelSnapshot, PlacementSettings, PlacerConfig, SleeveError,
    SleevePlacer,
};

fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("🚀 Starting sleeve-placer");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli) {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Sleeve placement failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
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

fn run(cli: &CliConfig) -> Result<(), SleeveError> {
    // 驗證配置
    cli.validate()?;
    let config = cli.resolve()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, cli);

    let input = LocalStorage::new(".");
    let snapshot = ModelSnapshot::load(&input, &cli.model)?;

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No sleeves will be written");
        println!("🔍 Dry run:");
        println!("  Hosts: {}", snapshot.hosts.len());
        println!("  Linked models: {}", snapshot.links.len());
        println!("  Conduits: {}", snapshot.conduit_count());
        println!("  Existing sleeves: {}", snapshot.markers.len());
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let document = snapshot.into_document()?;
    let settings = PlacementSettings::from_provider(&config);
    let mut placer = SleevePlacer::new_with_monitoring(document, settings, monitor_enabled);

    let report = placer.run()?;

    if cli.dry_run {
        println!(
            "  Would place {} sleeve(s), {} already present",
            report.stats.markers_created, report.stats.already_placed
        );
        return Ok(());
    }

    // 輸出結果
    let output = LocalStorage::new(&cli.output_dir);
    report::write_csv_report(&output, &config.output.report_file, &report)?;
    report::write_summary(&output, &config.output.summary_file, &report)?;
    ModelSnapshot::from_document(placer.document()).save(&output, &config.output.snapshot_file)?;

    tracing::info!("✅ Sleeve placement completed successfully!");
    println!("✅ Placed {} sleeve(s)", report.stats.markers_created);
    println!("📁 Output saved to: {}", cli.output_dir);

    Ok(())
}

fn display_config_summary(config: &PlacerConfig, cli: &CliConfig) {
    println!("📋 Configuration Summary:");
    println!("  Model: {}", cli.model);
    println!(
        "  Families: wall='{}', floor='{}'",
        config.families.wall, config.families.floor
    );
    println!(
        "  Clearance: {} mm ({:?} model)",
        config.placement.clearance_mm, config.placement.model_unit
    );
    println!("  Skip existing: {}", config.placement.skip_existing);
    println!("  Output: {}", cli.output_dir);

    if cli.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
}
