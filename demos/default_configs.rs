use bao_lib::{
    default_configs, define_bao_parameters, load_bao_model, tabulate_multipoles, write_grid_csv,
    BaoModelConfig, CorrelationModel, GridSpec, ReportFormat,
};

fn describe(title: &str, config: &BaoModelConfig) {
    println!("{}:", title);
    println!(
        "   Templates: {} / {} / {}",
        config.fiducial_name, config.nowiggles_name, config.broadband_name
    );
    println!("   Reference redshift: {}", config.zref);
    println!("   Interpolation: {}", config.interp_method);
    match define_bao_parameters(config) {
        Ok(params) => println!(
            "   Free parameters: {} of {}\n",
            params.free_count(),
            params.len()
        ),
        Err(e) => println!("   Invalid parameters: {}\n", e),
    }
}

fn main() {
    println!("BAO-lib Default Configuration Examples\n");

    describe("1. DR9 Lyman-alpha mocks (everything free)", &default_configs::dr9_lya_mocks());
    describe("2. Peak only (broadband fixed)", &default_configs::peak_only());
    describe("3. Fixed peak (amplitude and scale fixed)", &default_configs::fixed_peak());

    // Optional: build a model from template files and tabulate its multipoles
    let Some(model_root) = std::env::args().nth(1) else {
        println!("Pass a template directory to build a model and write multipoles.csv");
        return;
    };

    let mut config = default_configs::dr9_lya_mocks();
    config.model_root = model_root;
    let model = match load_bao_model(&config) {
        Ok(model) => model,
        Err(e) => {
            println!("❌ Failed to build model: {:#}", e);
            return;
        }
    };

    let mut report = Vec::new();
    if model
        .print_to_stream(&mut report, &ReportFormat::default())
        .is_ok()
    {
        println!("{}", String::from_utf8_lossy(&report));
    }

    let params = model.parameters().values();
    let result = tabulate_multipoles(&model, config.zref, &params, &GridSpec::default())
        .and_then(|rows| write_grid_csv("multipoles.csv", &rows).map(|_| rows.len()));
    match result {
        Ok(rows) => println!("✅ Wrote {} rows to multipoles.csv", rows),
        Err(e) => println!("❌ Tabulation failed: {:#}", e),
    }
}
