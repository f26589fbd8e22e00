//! Lineage command line
//!
//! Loads a TOML scene, runs hierarchy steps on its selection and prints what
//! ends up selected.
//!
//! Run with: cargo run -p lineage_select -- demos/workshop.toml down down up
//!
//! Steps are `up`, `down`, `undo` and `redo`. Flags apply to every step:
//!
//! ```text
//! --recursive / --no-recursive   walk all generations or just one
//! --inclusive                    keep the original selection
//! --mod-objects                  treat modifier targets as children (down)
//! --unhide                       unhide hidden objects on the way
//! --config <path>                preferences file
//! --output <path>                save the resulting scene
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use lineage_scene::{serializer, Scene, SceneGraph};
use lineage_select::{
    Command, Direction, Error, FeedbackState, HudLabel, Result, SelectHierarchy,
    SelectHierarchyCommand, SelectPreferences, UndoHistory, WalkPolicy,
};

/// One step requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Walk(Direction),
    Undo,
    Redo,
}

impl std::str::FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "undo" => Ok(Self::Undo),
            "redo" => Ok(Self::Redo),
            other => other.parse().map(Self::Walk),
        }
    }
}

#[derive(Debug, Default)]
struct CliArgs {
    scene: Option<PathBuf>,
    steps: Vec<Step>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    recursive: Option<bool>,
    inclusive: bool,
    mod_objects: bool,
    unhide: bool,
}

impl CliArgs {
    fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut cli = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--recursive" => cli.recursive = Some(true),
                "--no-recursive" => cli.recursive = Some(false),
                "--inclusive" => cli.inclusive = true,
                "--mod-objects" => cli.mod_objects = true,
                "--unhide" => cli.unhide = true,
                "--config" => cli.config = Some(Self::value(&mut args, "--config")?),
                "--output" => cli.output = Some(Self::value(&mut args, "--output")?),
                flag if flag.starts_with("--") => {
                    return Err(Error::Parse(format!("Unknown flag: {}", flag)));
                }
                _ if cli.scene.is_none() => cli.scene = Some(PathBuf::from(&arg)),
                step => cli.steps.push(step.parse()?),
            }
        }

        Ok(cli)
    }

    fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<PathBuf> {
        args.next()
            .map(PathBuf::from)
            .ok_or_else(|| Error::Parse(format!("{} needs a path", flag)))
    }

    /// Apply command line overrides on top of the preferred flags.
    fn policy(&self, base: WalkPolicy) -> WalkPolicy {
        let mut policy = base;
        if let Some(recursive) = self.recursive {
            policy = policy.recursive(recursive);
        }
        if self.inclusive {
            policy = policy.include_selection(true);
        }
        if self.mod_objects {
            policy = policy.include_modifier_targets(true);
        }
        if self.unhide {
            policy = policy.unhide(true);
        }
        policy
    }
}

fn print_usage() {
    eprintln!("usage: lineage <scene.toml> [up|down|undo|redo]... [flags]");
    eprintln!();
    eprintln!("flags: --recursive --no-recursive --inclusive --mod-objects --unhide");
    eprintln!("       --config <path> --output <path>");
}

fn print_labels(labels: &[HudLabel]) {
    for label in labels {
        println!("  {}", label.text().replace('\n', " "));
    }
}

fn print_selection(scene: &Scene) {
    let selected = scene.selected();
    let names = scene.names_of(&selected);
    let active = scene
        .active()
        .and_then(|id| scene.name_of(id))
        .unwrap_or("-");
    println!("  selected: [{}]  active: {}", names.join(", "), active);
}

fn run(cli: &CliArgs) -> Result<()> {
    let Some(scene_path) = &cli.scene else {
        print_usage();
        return Err(Error::Parse("missing scene file".to_string()));
    };

    let prefs = SelectPreferences::load(cli.config.as_deref())?;
    let mut scene = serializer::load_file(scene_path)?;
    log::info!("Loaded scene '{}' with {} object(s)", scene.name(), scene.len());

    let mut history: UndoHistory<Scene> = UndoHistory::new();
    let mut feedback = FeedbackState::new();

    println!("{}", scene.name());
    print_selection(&scene);

    for step in &cli.steps {
        match step {
            Step::Walk(direction) => {
                let base = prefs.policy(*direction);
                let operator = SelectHierarchy::new(*direction).with_policy(cli.policy(base));
                println!("{}", operator.label());

                // Group auto-select runs inside the command so redo replays it
                let recursive = scene.settings.group_recursive_select;
                let mut cmd = SelectHierarchyCommand::new(operator).with_group_sync(recursive);
                cmd.execute(&mut scene)?;
                if let Some(result) = cmd.result() {
                    print_labels(&feedback.describe(*direction, &operator.policy, &result, &prefs.hud));
                }
                history.push(Box::new(cmd));
            }
            Step::Undo => {
                println!("Undo {}", history.undo_description().unwrap_or(""));
                if !history.undo(&mut scene)? {
                    println!("  nothing to undo");
                }
                // The last boundary belongs to a step that is no longer current
                feedback.reset();
            }
            Step::Redo => {
                println!("Redo {}", history.redo_description().unwrap_or(""));
                if !history.redo(&mut scene)? {
                    println!("  nothing to redo");
                }
                feedback.reset();
            }
        }
        print_selection(&scene);
    }

    if let Some(output) = &cli.output {
        serializer::save_file(&scene, output)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match CliArgs::parse(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {}", e);
            print_usage();
            return ExitCode::from(2);
        }
    };

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_steps_and_flags() {
        let cli = CliArgs::parse(args(&["scene.toml", "down", "UP", "undo", "--unhide", "--no-recursive"])).unwrap();
        assert_eq!(cli.scene, Some(PathBuf::from("scene.toml")));
        assert_eq!(
            cli.steps,
            vec![Step::Walk(Direction::Down), Step::Walk(Direction::Up), Step::Undo]
        );
        assert!(cli.unhide);
        assert_eq!(cli.recursive, Some(false));
    }

    #[test]
    fn test_parse_rejects_unknown_input() {
        assert!(CliArgs::parse(args(&["scene.toml", "sideways"])).is_err());
        assert!(CliArgs::parse(args(&["--bogus"])).is_err());
        assert!(CliArgs::parse(args(&["scene.toml", "--config"])).is_err());
    }

    #[test]
    fn test_overrides_apply_on_top_of_preferences() {
        let cli = CliArgs::parse(args(&["s.toml", "--recursive", "--mod-objects"])).unwrap();
        let policy = cli.policy(WalkPolicy::down());
        assert!(policy.recursive);
        assert!(policy.include_modifier_targets);
        assert!(!policy.unhide);

        let untouched = CliArgs::default().policy(WalkPolicy::up());
        assert_eq!(untouched, WalkPolicy::up());
    }
}
