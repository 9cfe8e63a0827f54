use vagen::{Opts, setup, config};
use clap::Parser;
use std::env;
use std::fs;
use std::path::PathBuf;
use tempdir::TempDir;


fn opts(extra: &[&str]) -> Opts {
    let mut args = vec!["vagen", "demos/pattern.lua"];
    args.extend_from_slice(extra);
    Opts::parse_from(&args)
}

#[test]
fn setup_from_script_test() {
    let config = config::Config::test_config();
    let job = setup(opts(&[]), &config).expect("Failed setup()");

    assert_eq!("pattern_gen", job.module_name);
    assert_eq!("// Generated by vagen from demos/pattern.lua", job.comment);
    assert_eq!(PathBuf::from("pattern_gen.va"), job.output);
    assert_eq!(Some(std::path::Path::new("demos/template.va")), job.template.source());

    let names: Vec<&str> = job.signals.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(vec!["clk", "cnt", "en", "cfg"], names);
    assert_eq!(16, job.signals[1].length);
    assert_eq!(8, job.signals[2].waves.len());
}

#[test]
fn run_with_overrides_test() {
    let tmpd = TempDir::new("vagen").unwrap();
    let dest = tmpd.path().join("custom.va");
    let dest_arg = dest.to_str().unwrap().to_string();

    let config = config::Config::test_config();
    let job = setup(opts(&["--module", "custom", "--comment", "// custom", "-o", &dest_arg]), &config)
        .expect("Failed setup()");
    let written = job.run().expect("Failed run()");

    assert_eq!(dest, written);

    let out = fs::read_to_string(&dest).unwrap();
    assert!(out.starts_with("// custom\n"));
    assert!(out.contains("module custom ( VDD, GND, clk, cnt, en, cfg ) ;"));
    assert!(out.contains("    integer wave_cfg [0:2] = { 2748, 0, 10 } ;"));
    assert!(out.contains("    integer wave_en [0:7] = { 0, 0, 1, 1, 1, 1, 0, 0 } ;"));
    assert!(out.contains("V( cfg[11] )"));
    assert!(!out.contains("$TEMPLATE_"));
}

#[test]
fn missing_module_test() {
    let tmpd = TempDir::new("vagen").unwrap();
    let script = tmpd.path().join("anon.lua");
    fs::write(&script, r#"signals = { clock("clk") }"#).unwrap();

    let args = ["vagen", script.to_str().unwrap()];
    let config = config::Config::test_config();

    assert!(setup(Opts::parse_from(&args), &config).is_err());
}

#[test]
fn missing_template_test() {
    let config = config::Config::test_config();

    assert!(setup(opts(&["--template", "no_such_template.va"]), &config).is_err());
}

/// A template named in a script falls back to the config template directory.
#[test]
fn script_template_from_config_test() {
    let configd = TempDir::new("vagen_config").unwrap();
    let templated = configd.path().join("templates");
    fs::create_dir(&templated).unwrap();
    fs::write(templated.join("pulse.va"), "$TEMPLATE_MODULE_NAME ( $TEMPLATE_PORT_LIST )").unwrap();

    let scriptd = TempDir::new("vagen_script").unwrap();
    let script = scriptd.path().join("pulse.lua");
    fs::write(&script, r#"
        module = "pulse"
        template = "pulse.va"
        output = "pulse_out.va"
        signals = { clock("clk"), bits("en", "10") }
    "#).unwrap();

    env::set_var("VAGEN_CONFIG_HOME", configd.path());
    let config = config::Config::load();
    env::remove_var("VAGEN_CONFIG_HOME");

    let args = ["vagen", script.to_str().unwrap()];
    let job = setup(Opts::parse_from(&args), &config).expect("Failed setup()");

    assert_eq!(Some(templated.join("pulse.va").as_path()), job.template.source());
    assert_eq!(scriptd.path().join("pulse_out.va"), job.output);

    let written = job.run().expect("Failed run()");
    assert_eq!("pulse ( clk, en )", fs::read_to_string(written).unwrap());
}
