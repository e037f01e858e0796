use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::process::ExitCode;

use celeste_frames::{read_configuration, selectors, Epoch, FrameGraph, FrameResult, TransformFactory};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, error};
use nalgebra::Vector3;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Off => write!(f, "off"),
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Inspect a frame graph description and evaluate transforms through it.
#[derive(Parser)]
#[command(author, version, about)]
pub struct FrameToolCli {
    /// RON description of the frame graph
    #[arg(short, long)]
    pub config: PathBuf,

    #[arg(short, long, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the frames in insertion order
    Frames,
    /// List the factories leaving or reaching a frame
    Edges { frame: String },
    /// Show the cheapest chain of factories between two frames
    Path { from: String, to: String },
    /// Move a state from one frame to another
    Transform {
        from: String,
        to: String,
        /// Seconds past J2000
        #[arg(short, long, default_value_t = 0.0)]
        epoch: f64,
        /// Position as x,y,z [m]
        #[arg(short, long, value_parser = parse_vector)]
        position: Vector3<f64>,
        /// Velocity as x,y,z [m/s]
        #[arg(short, long, value_parser = parse_vector)]
        velocity: Option<Vector3<f64>>,
        /// Acceleration as x,y,z [m/s²]
        #[arg(short, long, value_parser = parse_vector)]
        acceleration: Option<Vector3<f64>>,
    },
}

fn parse_vector(text: &str) -> Result<Vector3<f64>, String> {
    let components = text
        .split(',')
        .map(|c| c.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid component in '{text}': {e}"))?;
    match components.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!(
            "expected 3 comma separated components, got {}",
            components.len()
        )),
    }
}

fn fmt_vector(v: &Vector3<f64>) -> String {
    format!("({:.6}, {:.6}, {:.6})", v.x, v.y, v.z)
}

fn run(cli: FrameToolCli) -> FrameResult<()> {
    let config = read_configuration(&cli.config)?;
    let graph = config.build()?;
    debug!(
        "Loaded {} with {} frame(s)",
        cli.config.display(),
        graph.frame_count()
    );

    match cli.command {
        Command::Frames => list_frames(&graph),
        Command::Edges { frame } => list_edges(&graph, &frame),
        Command::Path { from, to } => {
            let path = graph.resolve_path_by(selectors::named(&from), selectors::named(&to))?;
            let names: Vec<&str> = path.frames().iter().map(|frame| frame.name()).collect();
            println!("{}", names.join(" -> "));
            for factory in path.factories() {
                println!("  {}", factory.name());
            }
            println!("hops: {}, cost: {}", path.hops(), path.cost());
        }
        Command::Transform {
            from,
            to,
            epoch,
            position,
            velocity,
            acceleration,
        } => {
            let epoch = Epoch::from_seconds_since_j2000(epoch);
            let transform =
                graph.get_transform_by(selectors::named(&from), selectors::named(&to), &epoch)?;
            let velocity = velocity.unwrap_or_else(Vector3::zeros);
            println!("factory: {}", transform.factory().name());
            match acceleration {
                Some(acceleration) => {
                    let (r, v, a) =
                        transform.transform_pos_vel_acc(&position, &velocity, &acceleration);
                    println!("position:     {}", fmt_vector(&r));
                    println!("velocity:     {}", fmt_vector(&v));
                    println!("acceleration: {}", fmt_vector(&a));
                }
                None => {
                    let (r, v) = transform.transform_pos_vel(&position, &velocity);
                    println!("position:     {}", fmt_vector(&r));
                    println!("velocity:     {}", fmt_vector(&v));
                }
            }
        }
    }
    Ok(())
}

fn list_frames(graph: &FrameGraph) {
    for frame in graph.all_frames() {
        println!(
            "{:<24} {:?} ({} edge(s))",
            frame.name(),
            frame.category(),
            graph.factories_touching(frame).count()
        );
    }
}

fn list_edges(graph: &FrameGraph, frame: &str) {
    let mut edges = graph.factories_touching_by(selectors::named(frame)).peekable();
    if edges.peek().is_none() {
        println!("No factory touches '{frame}'");
        return;
    }
    for edge in edges {
        println!(
            "{} -> {} via {} (cost {})",
            edge.source,
            edge.target,
            edge.factory.name(),
            edge.cost
        );
    }
}

fn main() -> ExitCode {
    let cli = FrameToolCli::parse();
    if let Err(e) = TermLogger::init(
        cli.log_level.into(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Could not install the terminal logger: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("frametool: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_vector() {
        assert_eq!(
            parse_vector("1, -2.5,3e3").unwrap(),
            Vector3::new(1.0, -2.5, 3000.0)
        );
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("1,x,3").is_err());
    }

    #[test]
    fn test_cli_parses_transform() {
        let cli = FrameToolCli::try_parse_from([
            "frametool",
            "--config",
            "graph.ron",
            "transform",
            "Earth",
            "Sun",
            "--epoch",
            "86400",
            "--position",
            "0,0,0",
        ])
        .unwrap();
        assert!(cli.log_level == LogLevel::Warn);
        match cli.command {
            Command::Transform {
                epoch,
                position,
                velocity,
                ..
            } => {
                assert_eq!(epoch, 86400.0);
                assert_eq!(position, Vector3::zeros());
                assert!(velocity.is_none());
            }
            _ => panic!("Expected the transform subcommand"),
        }
    }
}
