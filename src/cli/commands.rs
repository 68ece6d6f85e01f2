use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::Settings;
use crate::domain::{self, ConceptTree};
use crate::export::{self, ExportOptions};
use crate::infrastructure::{CommandClipboard, RealCommandRunner};
use crate::service::{self, FileAttachment, GenerateRequest, HttpMindMapService};
use crate::view::Viewer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Generate {
            concept,
            file,
            output,
            offline,
            json,
        }) => _generate(concept.as_deref(), file.as_deref(), output.as_deref(), *offline, *json),
        Some(Commands::Show { tree }) => _show(tree),
        Some(Commands::Layout {
            tree,
            width,
            height,
            json,
        }) => _layout(tree, *width, *height, *json),
        Some(Commands::Export {
            tree,
            output,
            clipboard,
            collapse,
            zoom,
            pan,
        }) => _export(tree, output.as_deref(), *clipboard, collapse, *zoom, pan.as_deref()),
        Some(Commands::Config { command }) => _config(command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "conceptmap", &mut io::stdout());
            Ok(())
        }
        Some(Commands::Info) => _info(),
        None => {
            Cli::command().print_help().map_err(|source| CliError::Io {
                context: "printing help".into(),
                source,
            })?;
            Ok(())
        }
    }
}

#[instrument]
fn _generate(
    concept: Option<&str>,
    file: Option<&Path>,
    output: Option<&Path>,
    offline: bool,
    json: bool,
) -> CliResult<()> {
    let settings = Settings::load()?;
    let request = build_request(concept, file)?;
    request.validate()?;

    let tree = if offline || settings.offline {
        debug!("offline mode, skipping service");
        domain::placeholder_tree(request.fallback_seed())
    } else {
        let service = HttpMindMapService::new(&settings.endpoint, settings.timeout());
        service::submit(&service, &request)?
    };

    if let Some(path) = output {
        write_tree_file(&tree, path)?;
        output::success(&format!("tree written to {}", path.display()));
    }
    print_tree(&tree, json);
    Ok(())
}

#[instrument]
fn _show(tree_path: &Path) -> CliResult<()> {
    let tree = load_tree(tree_path)?;
    print_tree(&tree, false);
    output::detail(&format!(
        "{} nodes, depth {}",
        tree.node_count(),
        tree.depth()
    ));
    Ok(())
}

#[instrument]
fn _layout(
    tree_path: &Path,
    width: Option<f32>,
    height: Option<f32>,
    json: bool,
) -> CliResult<()> {
    let settings = Settings::load()?;
    let mut canvas = settings.canvas();
    if let Some(w) = width {
        canvas.width = w;
    }
    if let Some(h) = height {
        canvas.height = h;
    }

    let tree = load_tree(tree_path)?;
    let layout = crate::layout::compute(&tree, &Default::default(), canvas);

    if json {
        let nodes: Vec<Value> = layout
            .nodes
            .iter()
            .map(|n| {
                serde_json::json!({
                    "label": n.label,
                    "x": n.x,
                    "y": n.y,
                    "width": n.width,
                    "height": n.height,
                    "depth": n.depth,
                })
            })
            .collect();
        output::info(&serde_json::to_string_pretty(&nodes).unwrap_or_default());
    } else {
        for n in &layout.nodes {
            output::info(&format!(
                "{:<30} ({:>7.1}, {:>7.1})  {}x{}  depth {}",
                n.label, n.x, n.y, n.width, n.height, n.depth
            ));
        }
    }
    Ok(())
}

#[instrument]
fn _export(
    tree_path: &Path,
    output_path: Option<&Path>,
    clipboard: bool,
    collapse: &[String],
    zoom: Option<f32>,
    pan: Option<&[f32]>,
) -> CliResult<()> {
    let settings = Settings::load()?;
    let tree = load_tree(tree_path)?;

    let mut viewer = Viewer::new(tree, settings.canvas(), settings.zoom_bounds());
    for name in collapse {
        viewer.toggle_collapse_by_name(name)?;
    }
    if let Some(z) = zoom {
        viewer.zoom_by(z);
    }
    if let Some([dx, dy]) = pan {
        viewer.pan_by(*dx, *dy);
    }

    let options = ExportOptions {
        pixel_ratio: settings.export.pixel_ratio,
        font_path: settings.export.font_path.clone(),
    };
    let png = export::to_png(viewer.scene(), &options)?;

    let target: Option<PathBuf> = match (output_path, clipboard) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, false) => Some(PathBuf::from("concept-map.png")),
        (None, true) => None,
    };

    let mut wrote_file = false;
    if let Some(path) = &target {
        export::write_png_file(&png, path)?;
        output::success(&format!("diagram written to {}", path.display()));
        wrote_file = true;
    }

    if clipboard {
        let clip = CommandClipboard::new(
            Box::new(RealCommandRunner),
            settings.export.clipboard_command.clone(),
        );
        match export::copy_to_clipboard(&png, &clip) {
            Ok(()) => output::success("diagram copied to clipboard"),
            Err(e) if wrote_file => output::warning(&format!("clipboard copy failed: {e}")),
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn _config(command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load()?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Init => {
            let path = Settings::global_config_path().ok_or_else(|| {
                CliError::InvalidArgs("cannot determine config directory".into())
            })?;
            Settings::write_template(&path)?;
            output::success(&format!("config template written to {}", path.display()));
        }
        ConfigCommands::Path => {
            let path = Settings::global_config_path().ok_or_else(|| {
                CliError::InvalidArgs("cannot determine config directory".into())
            })?;
            output::info(&path.display());
        }
    }
    Ok(())
}

fn _info() -> CliResult<()> {
    let settings = Settings::load()?;
    output::header("conceptmap");
    output::detail(&format!("version:  {}", env!("CARGO_PKG_VERSION")));
    output::detail(&format!("endpoint: {}", settings.endpoint));
    output::detail(&format!(
        "config:   {}",
        Settings::global_config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<unknown>".into())
    ));
    output::detail(&format!("offline:  {}", settings.offline));
    Ok(())
}

fn build_request(concept: Option<&str>, file: Option<&Path>) -> CliResult<GenerateRequest> {
    let attachment = match file {
        Some(path) => {
            let mime = service::mime_for_path(path)?;
            let bytes = std::fs::read(path).map_err(|source| CliError::ReadInput {
                path: path.to_path_buf(),
                source,
            })?;
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload")
                .to_string();
            Some(FileAttachment {
                name,
                mime: mime.into(),
                bytes,
            })
        }
        None => None,
    };
    Ok(GenerateRequest {
        concept: concept.map(|c| c.to_string()),
        file: attachment,
    })
}

/// Reads a stored tree file and normalizes it. Malformed files still yield
/// the diagnostic tree, consistent with how service responses are handled.
fn load_tree(path: &Path) -> CliResult<ConceptTree> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadInput {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content).map_err(|source| CliError::ParseInput {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(domain::normalize(&value))
}

fn write_tree_file(tree: &ConceptTree, path: &Path) -> CliResult<()> {
    let body = serde_json::to_string_pretty(&tree.to_value()).unwrap_or_default();
    std::fs::write(path, body).map_err(|source| CliError::Io {
        context: format!("writing {}", path.display()),
        source,
    })
}

fn print_tree(tree: &ConceptTree, json: bool) {
    if json {
        output::info(
            &serde_json::to_string_pretty(&tree.to_value()).unwrap_or_default(),
        );
    } else if let Some(rendered) = tree.to_tree_string() {
        output::info(&rendered);
    }
}
