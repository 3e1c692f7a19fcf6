use crate::component::{FullWindowPlayer, MediaInspector, PanePlayer, ThumbnailBatch};
use crate::config::Config;
use crate::pause;
use crate::tools::{ToolCommand, locate_tool, run_and_wait};
use anyhow::Result;
use console::{Term, style};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn report(result: Result<()>) {
    if let Err(e) = result {
        eprintln!("{} {}", style("錯誤:").red().bold(), e);
    }
}

pub fn run_thumbnail_batch(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let batch = ThumbnailBatch::new(config.clone(), Arc::clone(shutdown_signal));
    report(batch.run());
    pause(term)
}

pub fn run_media_inspector(term: &Term, config: &Config) -> Result<()> {
    report(MediaInspector::new(config.clone()).run());
    pause(term)
}

pub fn run_full_window_player(term: &Term, config: &Config) -> Result<()> {
    report(FullWindowPlayer::new(config.clone()).run(term));
    pause(term)
}

pub fn run_pane_player(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &Config,
) -> Result<()> {
    let player = PanePlayer::new(config.clone(), Arc::clone(shutdown_signal));
    report(player.run());
    pause(term)
}

fn is_runnable(program: &Path) -> bool {
    run_and_wait(&ToolCommand::new(program).arg("-version")).is_ok()
}

pub fn run_tool_check(term: &Term, config: &Config) -> Result<()> {
    println!("{}", style("=== 外部工具檢查 ===").cyan().bold());

    match locate_tool(config.tool_locations()) {
        Some(path) => println!(
            "  {} 候選位置: {}",
            style("✓").green(),
            path.display()
        ),
        None => println!(
            "  {} 候選位置皆找不到擷取工具，將使用 PATH 上的設定",
            style("!").yellow()
        ),
    }

    let tools = &config.settings.tools;
    for (label, program) in [
        ("擷取", &tools.encoder),
        ("探測", &tools.probe),
        ("播放", &tools.player),
    ] {
        if is_runnable(program) {
            println!("  {} {label}: {}", style("✓").green(), program.display());
        } else {
            println!(
                "  {} {label}: {} 無法執行",
                style("✗").red(),
                program.display()
            );
        }
    }

    pause(term)
}
