use std::env;
use std::path::PathBuf;

use crate::devices::DEFAULT_ROOF_ANGLE_DEG;

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Simulate(SimulateOptions),
    SizePv(SizePvOptions),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulateOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub telemetry_out: Option<PathBuf>,
    pub json_out: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SizePvOptions {
    pub length_m: f64,
    pub width_m: f64,
    pub panel_width_mm: f64,
    pub panel_height_mm: f64,
    pub panel_power_w: f64,
    pub roof_angle_deg: f64,
}

pub fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<Command, String> {
    if args.len() == 1 && (args[0] == "--help" || args[0] == "-h") {
        print_usage();
        std::process::exit(0);
    }
    match args.first().map(String::as_str) {
        Some("size-pv") => parse_size_pv(&args[1..]).map(Command::SizePv),
        _ => parse_simulate(&args).map(Command::Simulate),
    }
}

fn parse_simulate(args: &[String]) -> Result<SimulateOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut telemetry_out = None;
    let mut json_out = None;
    let mut verbose = false;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --scenario (expected a TOML file path)",
                )?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--json-out" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --json-out (expected a file path)")?;
                if json_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--json-out provided more than once".to_string());
                }
            }
            "--verbose" | "-v" => verbose = true,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("tutorial".to_string());
    }

    Ok(SimulateOptions {
        scenario,
        preset,
        telemetry_out,
        json_out,
        verbose,
    })
}

fn parse_size_pv(args: &[String]) -> Result<SizePvOptions, String> {
    let mut i = 0usize;
    let mut length_m = None;
    let mut width_m = None;
    let mut panel_width_mm = None;
    let mut panel_height_mm = None;
    let mut panel_power_w = None;
    let mut roof_angle_deg = None;

    while i < args.len() {
        let flag = args[i].as_str();
        i += 1;
        let slot = match flag {
            "--length" => &mut length_m,
            "--width" => &mut width_m,
            "--panel-width" => &mut panel_width_mm,
            "--panel-height" => &mut panel_height_mm,
            "--panel-power" => &mut panel_power_w,
            "--roof-angle" => &mut roof_angle_deg,
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        };
        if slot.replace(parse_number(args, i, flag)?).is_some() {
            return Err(format!("{flag} provided more than once"));
        }
        i += 1;
    }

    let required = |value: Option<f64>, flag: &str| {
        value.ok_or_else(|| format!("size-pv requires {flag}"))
    };

    Ok(SizePvOptions {
        length_m: required(length_m, "--length")?,
        width_m: required(width_m, "--width")?,
        panel_width_mm: required(panel_width_mm, "--panel-width")?,
        panel_height_mm: required(panel_height_mm, "--panel-height")?,
        panel_power_w: required(panel_power_w, "--panel-power")?,
        roof_angle_deg: roof_angle_deg.unwrap_or(DEFAULT_ROOF_ANGLE_DEG),
    })
}

fn parse_number(args: &[String], index: usize, flag: &str) -> Result<f64, String> {
    let raw = args.next_or_err(index, &format!("missing value for {flag} (expected a number)"))?;
    raw.parse::<f64>()
        .map_err(|_| format!("{flag} value \"{raw}\" is not a valid number"))
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  battery-sim [--scenario <path> | --preset <name>] [--telemetry-out <path>] \
         [--json-out <path>] [--verbose]"
    );
    eprintln!(
        "  battery-sim size-pv --length <m> --width <m> --panel-width <mm> \
         --panel-height <mm> --panel-power <W> [--roof-angle <deg>]"
    );
    eprintln!();
    eprintln!("Presets: tutorial (default), solar_home, lossy");
}
