
use std::fs;

use bao_lib::{
    broadband_file_name, load_bao_model, load_bao_model_from_file, tabulate_angular,
    tabulate_multipoles, template_file_name, write_grid_csv, BaoCorrelationModel,
    BroadbandCategory, CorrelationModel, GridSpec, InterpMethod, Multipole, ReportFormat,
    PARAM_COUNT,
};
use rand::Rng;
use test_utils::{assert_close, expected_xi, kaiser, TemplateDir, BROADBAND, FIDUCIAL, NOWIGGLES};

// [alpha, beta, (1+beta)*bias, amplitude, scale, xio, a0, a1, a2]
const PARAMS: [f64; PARAM_COUNT] = [3.8, 1.2, -0.34, 1.3, 1.04, 0.02, -2.5, -1.8, 0.7];

/// Loads the 15 synthetic template files and checks the angular prediction against a
/// direct Kaiser + BAO computation for many random parameter vectors.
#[test]
fn test_angular_prediction_matches_reference() {
    let dir = TemplateDir::new("angular");
    let model = load_bao_model(&dir.config()).expect("Failed to load templates");
    let zref = model.zref();

    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let mut params = [0.0; PARAM_COUNT];
        for p in params.iter_mut() {
            *p = rng.gen_range(-2.0..2.0);
        }
        params[1] = rng.gen_range(0.0..2.0);
        params[4] = rng.gen_range(0.8..1.2);
        let r = rng.gen_range(10.0..200.0);
        let mu = rng.gen_range(-1.0..1.0);
        let z = rng.gen_range(1.8..3.0);

        let beta = params[1];
        let actual = model.evaluate(r, mu, z, &params).unwrap();
        let expected = expected_xi(&params, z, zref, r, |f, radius| kaiser(f, radius, mu, beta));
        assert_close(actual, expected, 1e-8);
    }
}

/// Multipole predictions use the undistorted template multipoles.
#[test]
fn test_multipole_prediction_matches_reference() {
    let dir = TemplateDir::new("multipole");
    let model = load_bao_model(&dir.config()).unwrap();

    for multipole in Multipole::ALL {
        for r in [15.0, 62.5, 104.0, 180.0] {
            let actual = model.evaluate_multipole(r, multipole, 2.5, &PARAMS).unwrap();
            let expected =
                expected_xi(&PARAMS, 2.5, model.zref(), r, |f, radius| f(multipole, radius));
            assert_close(actual, expected, 1e-8);
        }
    }
}

/// Interleaving angular and multipole queries never changes either result.
#[test]
fn test_interleaved_queries_are_independent() {
    let dir = TemplateDir::new("interleaved");
    let model = load_bao_model(&dir.config()).unwrap();

    let mono = model.evaluate_multipole(90.0, Multipole::Monopole, 2.25, &PARAMS).unwrap();
    let angular = model.evaluate(90.0, 0.7, 2.25, &PARAMS).unwrap();

    let mut other = PARAMS;
    other[1] = 3.0;
    let _ = model.evaluate(40.0, -0.2, 2.0, &other).unwrap();

    assert_eq!(
        model.evaluate_multipole(90.0, Multipole::Monopole, 2.25, &PARAMS).unwrap(),
        mono
    );
    assert_eq!(model.evaluate(90.0, 0.7, 2.25, &PARAMS).unwrap(), angular);
}

/// With no distortion the angular prediction is the monopole prediction for every mu.
#[test]
fn test_undistorted_prediction_is_isotropic() {
    let dir = TemplateDir::new("isotropic");
    let model = load_bao_model(&dir.config()).unwrap();
    let mut params = PARAMS;
    params[1] = 0.0;

    let mono = model.evaluate_multipole(120.0, Multipole::Monopole, 2.4, &params).unwrap();
    for mu in [-1.0, -0.5, 0.0, 0.25, 1.0] {
        assert_close(model.evaluate(120.0, mu, 2.4, &params).unwrap(), mono, 1e-12);
    }
}

#[test]
fn test_linear_interpolation_method() {
    let dir = TemplateDir::new("linear");
    let mut config = dir.config();
    config.interp_method = InterpMethod::Linear;
    let linear = load_bao_model(&config).unwrap();
    let spline = load_bao_model(&dir.config()).unwrap();

    // Both reproduce the linear template curves
    let a = linear.evaluate(77.0, 0.4, 2.1, &PARAMS).unwrap();
    let b = spline.evaluate(77.0, 0.4, 2.1, &PARAMS).unwrap();
    assert_close(a, b, 1e-9);
}

#[test]
fn test_model_root_with_trailing_separator() {
    let dir = TemplateDir::new("trailing");
    let mut config = dir.config();
    config.model_root.push('/');
    let with_slash = load_bao_model(&config).unwrap();
    let without = load_bao_model(&dir.config()).unwrap();

    assert_eq!(
        with_slash.evaluate(50.0, 0.5, 2.0, &PARAMS).unwrap(),
        without.evaluate(50.0, 0.5, 2.0, &PARAMS).unwrap()
    );
}

#[test]
fn test_file_naming_convention() {
    let dir = TemplateDir::new("naming");
    for m in Multipole::ALL {
        let order = m.order();
        assert!(dir.file(&format!("{}.{}.dat", FIDUCIAL, order)).exists());
        assert!(dir.file(&format!("{}.{}.dat", NOWIGGLES, order)).exists());
        for suffix in ['c', '1', '2'] {
            assert!(dir.file(&format!("{}{}.{}.dat", BROADBAND, suffix, order)).exists());
        }
    }
    assert_eq!(fs::read_dir(&dir.path).unwrap().count(), 15);
}

/// Every one of the 15 files is required; a missing one aborts construction.
#[test]
fn test_missing_file_aborts_construction() {
    let dir = TemplateDir::new("missing");
    let root = dir.root();
    let missing = broadband_file_name(
        &root,
        BROADBAND,
        BroadbandCategory::Linear2,
        Multipole::Hexadecapole,
    );
    fs::remove_file(&missing).unwrap();

    let err = load_bao_model(&dir.config()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("TestBBand2.4.dat"), "unexpected error: {}", message);
    assert!(message.contains("broadband template 'TestBBand2'"), "unexpected error: {}", message);
}

#[test]
fn test_malformed_file_aborts_construction() {
    let dir = TemplateDir::new("malformed");
    let bad = template_file_name(&dir.root(), NOWIGGLES, Multipole::Quadrupole);
    fs::write(&bad, "0.0 1.0\n5.0 not-a-number\n10.0 2.0\n").unwrap();

    let err = load_bao_model(&dir.config()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("TestLCDMSB.2.dat:2"), "unexpected error: {}", message);

    // Too few nodes for a cubic spline
    fs::write(&bad, "0.0 1.0\n5.0 2.0\n").unwrap();
    assert!(load_bao_model(&dir.config()).is_err());

    // Non-increasing radii
    fs::write(&bad, "0.0 1.0\n5.0 2.0\n5.0 3.0\n").unwrap();
    assert!(load_bao_model(&dir.config()).is_err());
}

#[test]
fn test_load_from_toml_file() {
    let dir = TemplateDir::new("toml");
    let config_path = dir.file("bao.toml");
    fs::write(
        &config_path,
        format!(
            "model_root = {:?}\nfiducial_name = {:?}\nnowiggles_name = {:?}\n\
             broadband_name = {:?}\nzref = 2.3\ninitial_amp = 0.9\nfix_bao = true\n\
             interp_method = \"Cubic\"\n",
            dir.root(),
            FIDUCIAL,
            NOWIGGLES,
            BROADBAND
        ),
    )
    .unwrap();

    let model = load_bao_model_from_file(&config_path).unwrap();
    assert_eq!(model.zref(), 2.3);

    let params = model.parameters();
    assert_eq!(params.get(3).unwrap().value, 0.9);
    assert!(params.get(3).unwrap().fixed);
    assert!(params.get(4).unwrap().fixed);
    assert_eq!(params.free_count(), 7);
}

/// A shared model gives the same answers from many threads at once.
#[test]
fn test_shared_model_across_threads() {
    let dir = TemplateDir::new("threads");
    let model = load_bao_model(&dir.config()).unwrap();

    let work: Vec<(f64, f64, [f64; PARAM_COUNT])> = (0..8)
        .map(|i| {
            let mut params = PARAMS;
            params[1] = 0.25 * i as f64;
            (20.0 + 20.0 * i as f64, -1.0 + 0.25 * i as f64, params)
        })
        .collect();
    let serial: Vec<f64> = work
        .iter()
        .map(|(r, mu, p)| model.evaluate(*r, *mu, 2.2, p).unwrap())
        .collect();

    let parallel: Vec<f64> = std::thread::scope(|s| {
        let handles: Vec<_> = work
            .iter()
            .map(|(r, mu, p)| {
                let model = &model;
                s.spawn(move || {
                    (0..100)
                        .map(|_| model.evaluate(*r, *mu, 2.2, p).unwrap())
                        .last()
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(serial, parallel);
}

#[test]
fn test_report() {
    let dir = TemplateDir::new("report");
    let model = load_bao_model(&dir.config()).unwrap();

    let mut buf = Vec::new();
    CorrelationModel::print_to_stream(&model, &mut buf, &ReportFormat::default()).unwrap();
    let text = String::from_utf8(buf).unwrap();

    for name in ["alpha", "beta", "(1+beta)*bias", "BAO scale", "BBand a2"] {
        assert!(text.contains(name), "missing {} in:\n{}", name, text);
    }
    assert!(text.contains("Reference redshift = 2.25"));
}

#[test]
fn test_tabulate_and_export() {
    let dir = TemplateDir::new("export");
    let model: BaoCorrelationModel = load_bao_model(&dir.config()).unwrap();
    let grid = GridSpec {
        r_min: 50.0,
        r_max: 150.0,
        n_r: 3,
        mu_values: vec![0.0, 1.0],
    };

    let angular = tabulate_angular(&model, 2.25, &PARAMS, &grid).unwrap();
    assert_eq!(angular.len(), 6);
    assert_eq!((angular[3].r, angular[3].mu), (100.0, 1.0));
    assert_eq!(angular[3].xi, model.evaluate(100.0, 1.0, 2.25, &PARAMS).unwrap());

    let multipoles = tabulate_multipoles(&model, 2.25, &PARAMS, &grid).unwrap();
    assert_eq!(multipoles.len(), 9);
    assert_eq!(multipoles[4].ell, 2);
    assert_eq!(
        multipoles[4].xi,
        model.evaluate_multipole(100.0, Multipole::Quadrupole, 2.25, &PARAMS).unwrap()
    );

    let path = dir.file("grid.csv");
    write_grid_csv(&path, &multipoles).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().next(), Some("r,ell,xi"));
    assert_eq!(text.lines().count(), 10);

    assert!(tabulate_angular(&model, 2.25, &PARAMS[..5], &grid).is_err());
}
