//! Demo driver for the dialog lifecycle
//!
//! Plays the embedder role: builds a document with a container node, opens a
//! confirm dialog, and drives the events a browser would deliver (the close
//! trigger, the leave transition-end, optionally a backdrop click). Run with
//! `RUST_LOG=zero_dialog=debug` to watch the lifecycle.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use zero_dialog::{
    events, new_document, Content, DialogComponent, DialogConfig, DialogContext, DialogError,
    DialogRef, DialogService, DocumentHandle, NodeId, Rect, ZeroDialogConfig,
};

const CONTAINER_ID: &str = "dialog-root";

#[derive(Parser, Debug)]
#[command(name = "demo", about = "Open a dialog and drive it to completion")]
struct Cli {
    /// Close synchronously instead of waiting for a leave transition
    #[arg(long)]
    no_animation: bool,

    /// Dismiss via a simulated backdrop click instead of a confirm result
    #[arg(long)]
    via_backdrop: bool,

    /// Delay before the close trigger fires
    #[arg(long, default_value = "150ms", value_parser = humantime::parse_duration)]
    close_delay: Duration,
}

/// A minimal confirm dialog: renders a prompt, hands its close handle back to
/// the driver through a channel.
struct ConfirmDialog {
    handle_tx: tokio::sync::mpsc::UnboundedSender<DialogRef>,
}

impl DialogComponent for ConfirmDialog {
    fn mount(
        &mut self,
        doc: &DocumentHandle,
        slot: NodeId,
        ctx: &DialogContext,
    ) -> Result<Vec<NodeId>, DialogError> {
        let prompt = ctx.data["prompt"].as_str().unwrap_or("Proceed?").to_string();
        let node = {
            let mut d = doc.lock().expect("document lock");
            let node = d.create_element("p");
            d.set_attribute(node, "text", prompt)?;
            d.append_child(slot, node)?;
            node
        };
        let _ = self.handle_tx.send(ctx.dialog_ref.clone());
        Ok(vec![node])
    }

    fn on_destroy(&mut self, _doc: &DocumentHandle) {
        info!("confirm dialog destroyed");
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = init_logging() {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(Cli::parse()).await {
        error!("Demo error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "demo=info,zero_dialog=debug".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let doc = new_document();
    {
        let mut d = doc.lock().expect("document lock");
        let root = d.root();
        let container = d.create_element("div");
        d.set_id(container, CONTAINER_ID)?;
        d.append_child(root, container)?;
    }

    let mut global = ZeroDialogConfig::new(CONTAINER_ID)
        .with_close_fallback(Duration::from_secs(2));
    if cli.no_animation {
        global = global.enable_animations(false);
    }
    let dialogs = DialogService::new(doc.clone(), global);

    let (handle_tx, mut handle_rx) = tokio::sync::mpsc::unbounded_channel();
    let closed = dialogs.open(
        Content::component(move || ConfirmDialog {
            handle_tx: handle_tx.clone(),
        }),
        Some(
            DialogConfig::new()
                .with_dialog_node_class("confirm-dialog")
                .with_dialog_data(json!({"prompt": "Delete everything?"})),
        ),
    )?;
    let handle = handle_rx
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("dialog mounted without reporting its handle"))?;

    // The surface occupies the middle of a pretend viewport, so coordinates
    // near the origin land on the backdrop.
    doc.lock()
        .expect("document lock")
        .set_bounding_rect(handle.surface(), Rect::new(200.0, 150.0, 400.0, 300.0))?;

    info!(dialog = %handle.dialog_id(), "dialog open, scheduling close trigger");
    let driver = tokio::spawn(drive_close(
        doc.clone(),
        handle.clone(),
        cli.via_backdrop,
        cli.close_delay,
    ));

    let result = closed.await;
    info!(?result, "confirm dialog settled");
    driver.await?;

    // Second act: template content, dismissed from the backdrop.
    let (notice_tx, mut notice_rx) = tokio::sync::mpsc::unbounded_channel();
    let closed = dialogs.open(
        Content::template(move |doc, slot, ctx| {
            let mut d = doc.lock().expect("document lock");
            let node = d.create_element("p");
            d.set_attribute(node, "text", "Saved.")?;
            d.append_child(slot, node)?;
            let _ = notice_tx.send(ctx.dialog_ref.clone());
            Ok(vec![node])
        }),
        Some(DialogConfig::new().animated(false)),
    )?;
    let notice = notice_rx
        .recv()
        .await
        .ok_or_else(|| anyhow::anyhow!("template mounted without reporting its handle"))?;
    doc.lock()
        .expect("document lock")
        .set_bounding_rect(notice.surface(), Rect::new(200.0, 150.0, 400.0, 300.0))?;

    info!(dialog = %notice.dialog_id(), "notice dialog open, dismissing from the backdrop");
    events::dispatch_click(&doc, notice.surface(), 5.0, 5.0);
    let result = closed.await;
    info!(?result, "notice dialog settled");

    let remaining = {
        let d = doc.lock().expect("document lock");
        d.element_by_id(CONTAINER_ID).map(|c| d.child_count(c))
    };
    info!(?remaining, "container children after teardown");
    Ok(())
}

/// Fire the close trigger after a delay, then deliver the transition-end the
/// leave animation waits for.
async fn drive_close(
    doc: DocumentHandle,
    handle: DialogRef,
    via_backdrop: bool,
    delay: Duration,
) {
    tokio::time::sleep(delay).await;

    if via_backdrop {
        info!("clicking the backdrop");
        events::dispatch_click(&doc, handle.surface(), 10.0, 10.0);
    } else {
        info!("confirming");
        handle.close_with(json!({"confirmed": true}));
    }

    if handle.animated() {
        tokio::time::sleep(Duration::from_millis(30)).await;
        events::dispatch_transition_end(&doc, handle.surface());
    }
}
