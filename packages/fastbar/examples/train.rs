//! A fake training loop with a master bar
//!
//! ```text
//! cargo run --example train --features cli -- --epochs 3
//! cargo run --example train --features cli -- --html report.html
//! ```
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use fastbar::{Context as _, DisplayId, DisplaySurface};

#[derive(Parser)]
struct Args {
    #[clap(flatten)]
    flags: fastbar::cli::Flags,
    /// Number of epochs
    #[clap(long, default_value_t = 5)]
    epochs: usize,
    /// Number of batches in each epoch
    #[clap(long, default_value_t = 40)]
    batches: usize,
    /// Render the bars as markup into this file instead of the terminal
    #[clap(long, value_name = "PATH")]
    html: Option<PathBuf>,
}

/// Surface that keeps the latest markup of each output in a file
struct HtmlFile {
    path: PathBuf,
    outputs: Vec<Option<String>>,
}

impl HtmlFile {
    fn save(&self) {
        let body = self.outputs.iter().flatten().cloned().collect::<Vec<_>>();
        if let Err(e) = std::fs::write(&self.path, body.join("\n<hr>\n")) {
            fastbar::error!("failed to write '{}': {e}", self.path.display());
        }
    }
}

impl DisplaySurface for HtmlFile {
    fn probe(&mut self) -> fastbar::Result<()> {
        fastbar::check!(
            std::fs::write(&self.path, ""),
            "cannot write to '{}'",
            self.path.display()
        )
    }

    fn display(&mut self, markup: &str) -> DisplayId {
        self.outputs.push(Some(markup.to_string()));
        self.save();
        DisplayId(self.outputs.len() as u64 - 1)
    }

    fn update(&mut self, id: DisplayId, markup: &str) {
        if let Some(output) = self.outputs.get_mut(id.0 as usize) {
            *output = Some(markup.to_string());
        }
        self.save();
    }

    fn clear(&mut self, id: DisplayId) {
        if let Some(output) = self.outputs.get_mut(id.0 as usize) {
            *output = None;
        }
        self.save();
    }
}

fn main() -> fastbar::Result<()> {
    let args = Args::parse();
    args.flags.apply();
    if let Some(path) = &args.html {
        let surface = HtmlFile {
            path: path.clone(),
            outputs: vec![],
        };
        let env = fastbar::install_display(surface, None)?;
        fastbar::debug!("rendering in {env:?}");
    }
    fastbar::catch_ctrlc()?;

    let mut epochs = fastbar::master().wrap(0..args.epochs)?;
    let mb = Arc::clone(epochs.bar());
    mb.report_table(["epoch", "train_loss", "valid_loss"]);
    let mut train_points = vec![];
    let mut valid_points = vec![];
    for epoch in &mut epochs {
        let mut loss = 0.0;
        for batch in mb.child().wrap(0..args.batches)? {
            loss = fake_loss(epoch, batch, args.batches);
            if let Some(bar) = mb.current_child() {
                bar.set_comment(format!("loss {loss:.4}"));
            }
            std::thread::sleep(Duration::from_millis(25));
        }
        let valid = validate(&mb, epoch, args.batches)
            .with_context(|| format!("validation failed at epoch {epoch}"))?;
        train_points.push((epoch as f64, loss));
        valid_points.push((epoch as f64, valid));
        mb.report_table([
            epoch.to_string(),
            format!("{loss:.4}"),
            format!("{valid:.4}"),
        ]);
        mb.update_chart(
            vec![train_points.clone(), valid_points.clone()],
            Some((0.0, args.epochs as f64)),
            None,
        );
    }
    drop(epochs);
    if fastbar::ctrlc_requested() {
        fastbar::warn!("training stopped early");
    }
    Ok(())
}

fn validate(mb: &Arc<fastbar::MasterBar>, epoch: usize, batches: usize) -> fastbar::Result<f64> {
    let steps = (batches / 4).max(1);
    let bar = mb.child().total(steps).spawn()?;
    let mut total = 0.0;
    for step in 0..steps {
        total += fake_loss(epoch, step, steps) * 1.1;
        fastbar::progress!(bar += 1);
        std::thread::sleep(Duration::from_millis(10));
    }
    fastbar::ensure!(total.is_finite(), "loss is not finite");
    Ok(total / steps as f64)
}

fn fake_loss(epoch: usize, batch: usize, batches: usize) -> f64 {
    let t = epoch as f64 + batch as f64 / batches.max(1) as f64;
    1.0 / (1.0 + t)
}
