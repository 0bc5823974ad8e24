//! The auto* workflow orchestrators and their help text.
//!
//! Each handler validates argument count and shape before any mutating
//! engine call, then composes naming, inventory and selection into one or
//! more engine invocations. The argument vectors are built by pure helpers
//! so the composition is testable without an engine.

use std::path::Path;

use time::OffsetDateTime;

use crate::dispatch;
use crate::engine::EngineClient;
use crate::errors::WorkflowError;
use crate::inventory;
use crate::naming::resolve_image_name;
use crate::select::{self, SelectionMethod};
use crate::tags;

pub const AUTOBUILD_LONG_HELP: &str = concat!(
    "Usage: autodock autobuild PATH\n",
    "\n",
    "Build the directory PATH into an image. The image is named after the\n",
    "final component of PATH, prefixed with the authenticated registry\n",
    "username when the engine reports one. Two tags are applied to the same\n",
    "build: a fresh UTC timestamp tag (YYYY-MM-DDTHH-MM-SSZ) and latest.\n",
    "\n",
    "Examples:\n",
    "  autodock autobuild .\n",
    "  autodock autobuild ~/projects/app",
);

pub const AUTOPRUNE_LONG_HELP: &str = concat!(
    "Usage: autodock autoprune PATH [all|old]\n",
    "\n",
    "Delete auto-managed tags of the image derived from PATH. With old (the\n",
    "default), every timestamp tag except the newest is deleted and latest\n",
    "is preserved. With all, every timestamp tag and latest are deleted.\n",
    "Tags applied manually are never touched. When nothing qualifies,\n",
    "reports \"no images deleted\" and exits successfully.\n",
    "\n",
    "Method synonyms: a = all, o = old.",
);

pub const AUTOPUSH_LONG_HELP: &str = concat!(
    "Usage: autodock autopush PATH\n",
    "\n",
    "Push the newest timestamp tag of the image derived from PATH, followed\n",
    "by latest. When no timestamp tag exists, reports \"no images to push\"\n",
    "and exits successfully.",
);

pub const AUTORUN_LONG_HELP: &str = concat!(
    "Usage: autodock autorun PATH METHOD [ARG...]\n",
    "\n",
    "Run the image derived from PATH in a container named after the image\n",
    "(with '/' replaced by '-'). METHOD selects the run mode:\n",
    "\n",
    "  ash|bash|sh            interactive shell as entrypoint, TTY allocated,\n",
    "                         container removed on exit\n",
    "  d|detach|detached      detached run; returns once the container started\n",
    "  e|entry|entrypoint     first ARG becomes the entrypoint binary and the\n",
    "                         remaining ARGs its arguments, interactive TTY\n",
    "  p|plain|i|interactive  interactive TTY run of the image entrypoint\n",
    "\n",
    "Remaining ARGs are passed to the container command.",
);

pub const HELP_LONG_HELP: &str = concat!(
    "Usage: autodock help [COMMAND]\n",
    "\n",
    "Without arguments, print the engine's help screen merged with the\n",
    "commands autodock overrides. With a COMMAND, print the override's\n",
    "detailed help when autodock owns it, and delegate to the engine\n",
    "otherwise.",
);

pub fn autobuild(engine: &EngineClient, args: &[String]) -> Result<i32, WorkflowError> {
    let path = match args {
        [path] => Path::new(path),
        _ => {
            return Err(WorkflowError::Usage(format!(
                "expected exactly one argument, got {}",
                args.len()
            )))
        }
    };
    let image = resolve_image_name(path, engine)?;
    let stamp = tags::timestamp_tag(OffsetDateTime::now_utc());
    engine.run_streaming("build", &build_argv(&image, &stamp, path))?;
    Ok(0)
}

/// `image build --tag NAME:STAMP --tag NAME:latest PATH`
pub fn build_argv(image: &str, stamp: &str, path: &Path) -> Vec<String> {
    vec![
        "image".to_string(),
        "build".to_string(),
        "--tag".to_string(),
        format!("{image}:{stamp}"),
        "--tag".to_string(),
        format!("{image}:{}", tags::LATEST),
        path.display().to_string(),
    ]
}

pub fn autoprune(engine: &EngineClient, args: &[String]) -> Result<i32, WorkflowError> {
    let (path, method) = match args {
        [path] => (Path::new(path), SelectionMethod::Old),
        [path, token] => (Path::new(path), SelectionMethod::parse(token)?),
        _ => {
            return Err(WorkflowError::Usage(format!(
                "expected one or two arguments, got {}",
                args.len()
            )))
        }
    };
    let image = resolve_image_name(path, engine)?;
    let selected = select::select(engine, &image, method)?;
    if selected.is_empty() {
        println!("no images deleted");
        return Ok(0);
    }
    engine.run_streaming("image removal", &rm_argv(&image, &selected))?;
    Ok(0)
}

/// `image rm NAME:TAG...` as one bulk removal.
pub fn rm_argv(image: &str, tags: &[String]) -> Vec<String> {
    let mut argv = vec!["image".to_string(), "rm".to_string()];
    argv.extend(tags.iter().map(|tag| format!("{image}:{tag}")));
    argv
}

pub fn autopush(engine: &EngineClient, args: &[String]) -> Result<i32, WorkflowError> {
    let path = match args {
        [path] => Path::new(path),
        _ => {
            return Err(WorkflowError::Usage(format!(
                "expected exactly one argument, got {}",
                args.len()
            )))
        }
    };
    let image = resolve_image_name(path, engine)?;
    let stamps = inventory::list_timestamp_tags(engine, &image)?;
    let newest = match stamps.last() {
        Some(tag) => tag.clone(),
        None => {
            println!("no images to push");
            return Ok(0);
        }
    };
    engine.run_streaming("push", &push_argv(&image, &newest))?;
    engine.run_streaming("push", &push_argv(&image, tags::LATEST))?;
    Ok(0)
}

/// `image push NAME:TAG`
pub fn push_argv(image: &str, tag: &str) -> Vec<String> {
    vec![
        "image".to_string(),
        "push".to_string(),
        format!("{image}:{tag}"),
    ]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunMethod {
    /// Interactive shell with a TTY; the container is removed on exit.
    Shell(&'static str),
    Detached,
    /// First extra argument becomes the entrypoint, the rest its arguments.
    Entrypoint,
    Plain,
}

impl RunMethod {
    /// Parse a method token, accepting the documented synonyms.
    pub fn parse(token: &str) -> Result<Self, WorkflowError> {
        match token {
            "ash" => Ok(RunMethod::Shell("ash")),
            "bash" => Ok(RunMethod::Shell("bash")),
            "sh" => Ok(RunMethod::Shell("sh")),
            "d" | "detach" | "detached" => Ok(RunMethod::Detached),
            "e" | "entry" | "entrypoint" => Ok(RunMethod::Entrypoint),
            "p" | "plain" | "i" | "interactive" => Ok(RunMethod::Plain),
            _ => Err(WorkflowError::UnknownRunMethod(token.to_string())),
        }
    }
}

pub fn autorun(engine: &EngineClient, args: &[String]) -> Result<i32, WorkflowError> {
    let (path, token, extra) = match args {
        [path, token, extra @ ..] => (Path::new(path), token.as_str(), extra),
        _ => {
            return Err(WorkflowError::Usage(format!(
                "expected at least two arguments, got {}",
                args.len()
            )))
        }
    };
    let method = RunMethod::parse(token)?;
    if matches!(method, RunMethod::Entrypoint) && extra.is_empty() {
        return Err(WorkflowError::Usage(
            "entrypoint run needs the entrypoint binary as the first extra argument".to_string(),
        ));
    }
    let image = resolve_image_name(path, engine)?;
    let container = container_name(&image);
    engine.run_streaming("run", &run_argv(&image, &container, &method, extra))?;
    Ok(0)
}

/// Container names may not contain '/', so the image name's separators
/// become '-'.
pub fn container_name(image: &str) -> String {
    image.replace('/', "-")
}

/// `run --name CONTAINER [mode flags] IMAGE [ARG...]`
pub fn run_argv(image: &str, container: &str, method: &RunMethod, extra: &[String]) -> Vec<String> {
    let mut argv = vec![
        "run".to_string(),
        "--name".to_string(),
        container.to_string(),
    ];
    match method {
        RunMethod::Shell(shell) => {
            argv.extend(
                ["--rm", "--interactive", "--tty", "--entrypoint"]
                    .iter()
                    .map(|s| s.to_string()),
            );
            argv.push(format!("/bin/{shell}"));
            argv.push(image.to_string());
            argv.extend(extra.iter().cloned());
        }
        RunMethod::Detached => {
            argv.push("--detach".to_string());
            argv.push(image.to_string());
            argv.extend(extra.iter().cloned());
        }
        RunMethod::Entrypoint => {
            argv.extend(
                ["--interactive", "--tty", "--entrypoint"]
                    .iter()
                    .map(|s| s.to_string()),
            );
            argv.push(extra[0].clone());
            argv.push(image.to_string());
            argv.extend(extra[1..].iter().cloned());
        }
        RunMethod::Plain => {
            argv.extend(["--interactive", "--tty"].iter().map(|s| s.to_string()));
            argv.push(image.to_string());
            argv.extend(extra.iter().cloned());
        }
    }
    argv
}

pub fn help(engine: &EngineClient, args: &[String]) -> Result<i32, WorkflowError> {
    match args {
        [] => dispatch::render_aggregate_help(engine),
        [name, ..] => match dispatch::overrides().get(name.as_str()) {
            Some(cmd) => {
                println!("{}", cmd.long_help);
                Ok(0)
            }
            None => {
                let mut argv = vec!["help".to_string()];
                argv.extend(args.iter().cloned());
                let status = engine.forward(&argv)?;
                Ok(status.code().unwrap_or(1))
            }
        },
    }
}
