//! Purpose: Hold top-level CLI command dispatch for `figtree`.
//! Exports: `dispatch_command`.
//! Role: Keep `main.rs` focused on parse/bootstrap and delegate command execution.
//! Invariants: Streaming commands (`outline`, `swatches`) print JSON lines; others print one document.
//! Invariants: Commands that only read `--input` never build a client or need a token.

use super::*;
use figtree::api::{FileQuery, ImageRequest, NewComment, document_from_json};
use figtree::{Node, Tree};
use super::outline::{OutlineOptions, outline_rows};
use super::swatches::{collect_swatches, swatch_json};

pub(super) fn dispatch_command(
    command: Command,
    connection: &Connection,
    color_mode: ColorMode,
) -> Result<RunOutcome, Error> {
    match command {
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "figtree", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
        Command::Outline {
            source,
            max_depth,
            visible_only,
        } => {
            let document = load_document(&source, connection)?;
            let options = OutlineOptions {
                max_depth,
                visible_only,
            };
            for row in outline_rows(&document, options) {
                emit_json_line(&row);
            }
            Ok(RunOutcome::ok())
        }
        Command::Swatches { source } => {
            let document = load_document(&source, connection)?;
            for swatch in collect_swatches(&document) {
                emit_json_line(&swatch_json(&swatch));
            }
            Ok(RunOutcome::ok())
        }
        Command::Export {
            key,
            ids,
            format,
            scale,
        } => {
            let mut request = ImageRequest::new(ids).with_format(format.into());
            if let Some(scale) = scale {
                request = request.with_scale(scale);
            }
            let export = connection.client()?.get_images(&key, &request)?;
            let failed: Vec<&str> = export.failed().collect();
            if !failed.is_empty() {
                tracing::warn!(count = failed.len(), "some nodes could not be rendered");
            }
            emit_json(json!({ "images": export.images }), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Comments { key } => {
            let comments = connection.client()?.get_comments(&key)?;
            emit_json(json!({ "comments": comments }), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Comment {
            key,
            message,
            x,
            y,
            node_id,
            offset_x,
            offset_y,
        } => {
            let mut comment = NewComment::new(message);
            if let Some(node_id) = node_id {
                comment = comment.on_node(node_id, offset_x, offset_y);
            } else if let (Some(x), Some(y)) = (x, y) {
                comment = comment.at_point(x, y);
            }
            let posted = connection.client()?.post_comment(&key, &comment)?;
            emit_json(json!({ "comment": posted }), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Versions { key } => {
            let versions = connection.client()?.get_file_versions(&key)?;
            emit_json(json!({ "versions": versions }), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Projects { team_id } => {
            let team = connection.client()?.get_team_projects(&team_id)?;
            emit_json(json!(team), color_mode);
            Ok(RunOutcome::ok())
        }
        Command::Files { project_id } => {
            let files = connection.client()?.get_project_files(&project_id)?;
            emit_json(json!(files), color_mode);
            Ok(RunOutcome::ok())
        }
    }
}

fn load_document(source: &DocumentSource, connection: &Connection) -> Result<Tree<Node>, Error> {
    if let Some(path) = &source.input {
        let bytes = std::fs::read(path).map_err(|err| {
            let kind = match err.kind() {
                io::ErrorKind::NotFound => ErrorKind::NotFound,
                io::ErrorKind::PermissionDenied => ErrorKind::Permission,
                _ => ErrorKind::Io,
            };
            Error::new(kind)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        })?;
        return document_from_json(&bytes);
    }
    let key = source.key.as_deref().ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message("a file key or --input is required")
            .with_hint("Use `figtree outline <KEY>` or `figtree outline --input file.json`.")
    })?;
    let query = FileQuery {
        version: source.version.clone(),
        ..FileQuery::default()
    };
    let file = connection.client()?.get_file(key, &query)?;
    tracing::debug!(name = %file.name, version = %file.version, "fetched file");
    Ok(file.document)
}
