//! @acp:module "Interactive Command"
//! @acp:summary "Prompt-driven paper generation carrying a session between papers"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use rand::rngs::StdRng;
use rand::SeedableRng;

use super::generate::open_pool;
use crate::paper::{
    generate_paper, load_paper_config, render_paper, CliOverrides, OutputFormat, PaperConfig,
    Session,
};
use crate::pool::QuestionPool;

/// Options for the interactive command
#[derive(Debug, Clone)]
pub struct InteractiveOptions {
    pub pool: PathBuf,
    pub policy: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed: Option<u64>,
}

enum NextStep {
    Regenerate,
    ChangeCriteria,
    Save,
    Quit,
}

/// Execute the interactive command
pub fn execute_interactive(options: InteractiveOptions) -> Result<()> {
    let pool = open_pool(&options.pool)?;
    let cli_overrides = CliOverrides {
        preset: options.preset.clone(),
        ..Default::default()
    };
    let config = load_paper_config(options.policy.as_deref(), &cli_overrides)?;
    let theme = ColorfulTheme::default();
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    println!(
        "{} Loaded {} questions across {} units\n",
        style("✓").green(),
        pool.len(),
        pool.units().len()
    );

    let mut session = Session::new();
    let mut need_criteria = true;

    loop {
        if need_criteria {
            session = prompt_criteria(&pool, session, &theme)?;
            need_criteria = false;
        }

        let criteria = session
            .criteria()
            .context("Session has no units or target marks")?;

        let content = match generate_paper(&pool, &config, session.clone(), &criteria, &mut rng) {
            Ok((result, updated)) => {
                session = updated;
                let content = render_paper(&result, &config.paper, OutputFormat::Markdown)?;
                println!("\n{}\n", content);
                for notice in &result.degradations {
                    println!("{} {}", style("⚠").yellow(), notice);
                }
                println!(
                    "{} Paper #{}: {}/{} marks",
                    style("✓").green(),
                    session.papers_generated,
                    result.achieved_marks,
                    result.target_marks
                );
                content
            }
            Err(e) => {
                eprintln!("{} {}", style("✗").red(), e);
                need_criteria = true;
                continue;
            }
        };

        loop {
            match prompt_next_step(&theme)? {
                NextStep::Save => save_paper(&content, &config, &theme)?,
                NextStep::Regenerate => break,
                NextStep::ChangeCriteria => {
                    need_criteria = true;
                    break;
                }
                NextStep::Quit => return Ok(()),
            }
        }
    }
}

fn prompt_criteria(pool: &QuestionPool, session: Session, theme: &ColorfulTheme) -> Result<Session> {
    let units = pool.units();
    let defaults: Vec<bool> = units.iter().map(|u| session.units.contains(u)).collect();

    let chosen = loop {
        let picked = MultiSelect::with_theme(theme)
            .with_prompt("Select units (space to toggle, enter to confirm)")
            .items(&units)
            .defaults(&defaults)
            .interact()?;
        if !picked.is_empty() {
            break picked;
        }
        println!("{} Select at least one unit", style("✗").red());
    };

    let marks: u32 = Input::with_theme(theme)
        .with_prompt("Total marks")
        .default(session.target_marks.unwrap_or(100))
        .validate_with(|m: &u32| if *m > 0 { Ok(()) } else { Err("Marks must be positive") })
        .interact_text()?;

    Ok(session
        .with_units(chosen.into_iter().map(|i| units[i].clone()))
        .with_target(marks))
}

fn prompt_next_step(theme: &ColorfulTheme) -> Result<NextStep> {
    let choices = [
        "Generate another paper",
        "Change units or marks",
        "Save this paper",
        "Quit",
    ];
    let selection = Select::with_theme(theme)
        .with_prompt("Next")
        .items(&choices)
        .default(0)
        .interact()?;

    Ok(match selection {
        0 => NextStep::Regenerate,
        1 => NextStep::ChangeCriteria,
        2 => NextStep::Save,
        _ => NextStep::Quit,
    })
}

fn save_paper(content: &str, config: &PaperConfig, theme: &ColorfulTheme) -> Result<()> {
    let default_name = config
        .paper
        .subject
        .as_deref()
        .map(|s| format!("{}.md", s.to_lowercase().replace(' ', "-")))
        .unwrap_or_else(|| "paper.md".to_string());
    let path: String = Input::with_theme(theme)
        .with_prompt("Save to")
        .default(default_name)
        .interact_text()?;

    std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path))?;
    println!("{} Saved to {}", style("✓").green(), path);
    Ok(())
}
