use crate::config::{Config, SETTINGS_FILE, save_settings};
use crate::menu::handlers::{
    run_full_window_player, run_media_inspector, run_pane_player, run_thumbnail_batch,
    run_tool_check,
};
use crate::tools::locate_tool;
use anyhow::Result;
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn show_main_menu(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<bool> {
    term.clear_screen()?;

    println!("{}", style("=== 影片預覽工具 ===").cyan().bold());
    println!("{}", style("按 ESC 離開").dim());

    let options = vec![
        "批次產生縮圖",
        "檢視影片資訊",
        "全視窗播放",
        "內嵌播放",
        "檢查外部工具",
        "設定",
        "離開",
    ];

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("請選擇功能")
        .items(&options)
        .default(0)
        .interact_on_opt(term)?;

    match selection {
        Some(0) => run_thumbnail_batch(term, shutdown_signal, config)?,
        Some(1) => run_media_inspector(term, config)?,
        Some(2) => run_full_window_player(term, config)?,
        Some(3) => run_pane_player(term, shutdown_signal, config)?,
        Some(4) => run_tool_check(term, config)?,
        Some(5) => show_settings_menu(term, config)?,
        Some(6) | None => return Ok(false),
        _ => unreachable!(),
    }
    Ok(true)
}

/// 設定選單
fn show_settings_menu(term: &Term, config: &mut Config) -> Result<()> {
    loop {
        term.clear_screen()?;

        println!("{}", style("=== 設定 ===").cyan().bold());
        println!("{}", style("按 ESC 返回").dim());

        let tools = &config.settings.tools;
        let options = vec![
            format!("擷取工具: {}", tools.encoder.display()),
            format!("探測工具: {}", tools.probe.display()),
            format!("播放工具: {}", tools.player.display()),
            "從候選位置偵測擷取工具".to_string(),
            "返回".to_string(),
        ];

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("請選擇要修改的項目")
            .items(&options)
            .default(0)
            .interact_on_opt(term)?;

        let changed = match selection {
            Some(0) => edit_tool_path("擷取工具", &mut config.settings.tools.encoder)?,
            Some(1) => edit_tool_path("探測工具", &mut config.settings.tools.probe)?,
            Some(2) => edit_tool_path("播放工具", &mut config.settings.tools.player)?,
            Some(3) => detect_encoder(config),
            Some(4) | None => break,
            _ => unreachable!(),
        };

        if changed {
            save_settings(&config.settings, Path::new(SETTINGS_FILE))?;
            println!("\n{}", style("設定已儲存").green());
            std::thread::sleep(std::time::Duration::from_secs(1));
        }
    }

    Ok(())
}

fn edit_tool_path(label: &str, current: &mut PathBuf) -> Result<bool> {
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .default(current.display().to_string())
        .interact_text()?;

    let updated = PathBuf::from(input.trim());
    if updated.as_os_str().is_empty() || updated == *current {
        return Ok(false);
    }
    *current = updated;
    Ok(true)
}

fn detect_encoder(config: &mut Config) -> bool {
    let Some(found) = locate_tool(config.tool_locations()) else {
        println!("\n{}", style("候選位置皆找不到擷取工具").yellow());
        std::thread::sleep(std::time::Duration::from_secs(1));
        return false;
    };
    if found == config.settings.tools.encoder {
        return false;
    }
    config.settings.tools.encoder = found;
    true
}
