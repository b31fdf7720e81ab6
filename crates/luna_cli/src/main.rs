use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use luna_ephem::AnalyticEphemeris;
use luna_geometry::{
    LunarObservation, MoonSunData, ObservationConfig, ObserverLocation, ZenithPath, observe_batch,
    sun_moon_data_batch,
};
use luna_time::{Instant, Timestamp, format_timestamp};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "luna", about = "Lunar observation geometry calculator")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Azimuth, zenith and phase of the Moon over a time range
    Observe {
        /// Latitude in degrees (geodetic on Earth, planetographic on the Moon)
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// East longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Altitude above the reference spheroid in metres
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        alt: f64,
        /// First UTC time (YYYY-MM-DD hh:mm:ss or RFC 3339)
        #[arg(long)]
        start: String,
        /// Last UTC time, inclusive
        #[arg(long, conflicts_with = "count")]
        end: Option<String>,
        /// Number of samples when no end is given
        #[arg(long, default_value = "1")]
        count: usize,
        /// Step between samples in minutes
        #[arg(long, default_value = "60")]
        step_minutes: f64,
        /// Site is on the lunar surface
        #[arg(long)]
        moon: bool,
        /// Zenith/azimuth through a registered site segment
        #[arg(long)]
        kernel: bool,
        /// Measure zenith/azimuth from the Earth's centre
        #[arg(long)]
        earth_as_zenith_observer: bool,
        /// ObservationConfig as JSON; flags above override it
        #[arg(long)]
        config: Option<PathBuf>,
        /// Full records as JSON lines instead of CSV
        #[arg(long)]
        json: bool,
    },
    /// Selenographic position of the Sun and Sun-Moon distance over a time range
    Sun {
        /// First UTC time (YYYY-MM-DD hh:mm:ss or RFC 3339)
        #[arg(long)]
        start: String,
        /// Last UTC time, inclusive
        #[arg(long, conflicts_with = "count")]
        end: Option<String>,
        /// Number of samples when no end is given
        #[arg(long, default_value = "1")]
        count: usize,
        /// Step between samples in minutes
        #[arg(long, default_value = "60")]
        step_minutes: f64,
        /// JSON lines instead of CSV
        #[arg(long)]
        json: bool,
    },
}

fn init_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "luna=debug,info" } else { "luna=info" })
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}

fn parse_instant(s: &str) -> Result<Instant> {
    s.parse::<Instant>()
        .with_context(|| format!("invalid UTC time '{s}'"))
}

fn sample_times(
    start: &str,
    end: Option<&str>,
    count: usize,
    step_minutes: f64,
) -> Result<Vec<Timestamp>> {
    if !(step_minutes.is_finite() && step_minutes > 0.0) {
        bail!("step must be a positive number of minutes");
    }
    let start = parse_instant(start)?;
    let step_s = step_minutes * 60.0;
    let count = match end {
        Some(end) => {
            let end = parse_instant(end)?;
            let span = end.utc_seconds_since_j2000() - start.utc_seconds_since_j2000();
            if span < 0.0 {
                bail!("end is before start");
            }
            (span / step_s).floor() as usize + 1
        }
        None => count,
    };
    (0..count)
        .map(|i| -> Result<Timestamp> { Ok(start.plus_seconds(i as f64 * step_s)?.into()) })
        .collect()
}

fn load_config(path: Option<&PathBuf>) -> Result<ObservationConfig> {
    let Some(path) = path else {
        return Ok(ObservationConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let config: ObservationConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
    debug!(path = %path.display(), "loaded observation config");
    Ok(config)
}

fn print_csv_row(o: &LunarObservation) {
    let fmt = |v: Option<f64>| v.map(|x| format!("{x:.6}")).unwrap_or_default();
    println!(
        "{},{},{},{:.6},{},{:.6}",
        o.timestamp,
        fmt(o.azimuth_deg),
        fmt(o.zenith_deg),
        o.mpa_deg,
        o.phase_sign,
        o.illuminated_fraction
    );
}

fn print_sun_row(ts: &Timestamp, d: &MoonSunData) {
    println!(
        "{},{:.6},{:.6},{:.3},{:.9}",
        format_timestamp(ts).text,
        d.lon_sun_deg(),
        d.lat_sun_rad.to_degrees(),
        d.dist_sun_moon_km,
        d.dist_sun_moon_au
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let eph = AnalyticEphemeris::new();

    match cli.command {
        Commands::Observe {
            lat,
            lon,
            alt,
            start,
            end,
            count,
            step_minutes,
            moon,
            kernel,
            earth_as_zenith_observer,
            config,
            json,
        } => {
            let mut config = load_config(config.as_ref())?;
            if kernel {
                config.zenith_path = ZenithPath::Kernel;
            }
            config.earth_as_zenith_observer |= earth_as_zenith_observer;

            let location = if moon {
                ObserverLocation::on_moon(lat, lon, alt)?
            } else {
                ObserverLocation::new(lat, lon, alt)?
            };
            let times = sample_times(&start, end.as_deref(), count, step_minutes)?;
            info!(samples = times.len(), "observing");

            let records = observe_batch(&eph, &location, &times, &config)?;
            if json {
                for r in &records {
                    println!("{}", serde_json::to_string(r)?);
                }
            } else {
                let header = "timestamp,azimuth_deg,zenith_deg,mpa_deg,phase_sign";
                println!("{header},illuminated_fraction");
                records.iter().for_each(print_csv_row);
            }
        }

        Commands::Sun {
            start,
            end,
            count,
            step_minutes,
            json,
        } => {
            let times = sample_times(&start, end.as_deref(), count, step_minutes)?;
            info!(samples = times.len(), "sun positions");

            let data = sun_moon_data_batch(&eph, &times)?;
            if json {
                for (ts, d) in times.iter().zip(&data) {
                    let row = serde_json::json!({
                        "timestamp": format_timestamp(ts).text,
                        "sun": d,
                    });
                    println!("{row}");
                }
            } else {
                println!("timestamp,lon_sun_deg,lat_sun_deg,dist_sun_moon_km,dist_sun_moon_au");
                for (ts, d) in times.iter().zip(&data) {
                    print_sun_row(ts, d);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_from_range_are_inclusive() {
        let t = sample_times("2024-01-25 00:00:00", Some("2024-01-25 03:00:00"), 1, 60.0).unwrap();
        assert_eq!(t.len(), 4);
        let last = Instant::try_from(&t[3]).unwrap();
        assert_eq!(last.to_utc_string(), "2024-01-25 03:00:00");
    }

    #[test]
    fn samples_from_count() {
        let t = sample_times("2024-01-25 00:00:00", None, 3, 30.0).unwrap();
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn bad_ranges_rejected() {
        let backwards = sample_times("2024-01-25 03:00:00", Some("2024-01-25 00:00:00"), 1, 60.0);
        assert!(backwards.is_err());
        assert!(sample_times("2024-01-25 00:00:00", None, 3, 0.0).is_err());
        assert!(sample_times("not a time", None, 3, 60.0).is_err());
    }

    #[test]
    fn cli_parses_negative_coordinates() {
        let cli = Cli::try_parse_from([
            "luna",
            "observe",
            "--lat",
            "28.309283",
            "--lon",
            "-16.499143",
            "--alt",
            "2400",
            "--start",
            "2024-01-25 17:54:00",
            "--kernel",
        ])
        .unwrap();
        match cli.command {
            Commands::Observe { lon, kernel, .. } => {
                assert_eq!(lon, -16.499143);
                assert!(kernel);
            }
            Commands::Sun { .. } => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn cli_parses_sun_range() {
        let cli = Cli::try_parse_from([
            "luna",
            "sun",
            "--start",
            "2024-01-25 00:00:00",
            "--end",
            "2024-01-26 00:00:00",
            "--step-minutes",
            "30",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Sun {
                start,
                end,
                step_minutes,
                json,
                ..
            } => {
                assert_eq!(start, "2024-01-25 00:00:00");
                assert_eq!(end.as_deref(), Some("2024-01-26 00:00:00"));
                assert_eq!(step_minutes, 30.0);
                assert!(json);
                let times = sample_times(&start, end.as_deref(), 1, step_minutes).unwrap();
                assert_eq!(times.len(), 49);
            }
            Commands::Observe { .. } => panic!("wrong subcommand"),
        }
    }

    #[test]
    fn sun_range_rejects_end_with_count() {
        let parsed = Cli::try_parse_from([
            "luna",
            "sun",
            "--start",
            "2024-01-25 00:00:00",
            "--end",
            "2024-01-26 00:00:00",
            "--count",
            "3",
        ]);
        assert!(parsed.is_err());
    }
}
