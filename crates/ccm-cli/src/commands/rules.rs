//! Ignore rule commands

use colored::Colorize;

use ccm_core::SyncOrchestrator;
use ccm_meta::IgnoreRulesUpdate;

use crate::error::Result;

/// Run the rules show command
pub fn run_rules_show(engine: &SyncOrchestrator, cli: Option<&str>) -> Result<()> {
    let rules = engine.settings().read().ignore_rules;

    if let Some(cli) = cli {
        // Compile to surface syntax errors before printing.
        let matcher = engine.compile_ignore_rules(cli)?;
        println!("{} {} rules in effect for {}", "=>".blue().bold(), matcher.len(), cli.cyan());
        for rule in rules.global.iter().chain(rules.per_cli_rules(cli)) {
            println!("  {rule}");
        }
        return Ok(());
    }

    println!("{}", "global".cyan().bold());
    for rule in &rules.global {
        println!("  {rule}");
    }
    for (cli, list) in rules.per_cli.iter() {
        println!("{}", cli.cyan().bold());
        for rule in list {
            println!("  {rule}");
        }
    }
    Ok(())
}

/// Run the rules set-global command
pub fn run_rules_set_global(engine: &SyncOrchestrator, rules: Vec<String>) -> Result<()> {
    let count = rules.len();
    ccm_core::PatternMatcher::compile(&rules, &[] as &[String])?;
    engine.settings().update_ignore_rules(IgnoreRulesUpdate {
        global: Some(rules),
        per_cli: Vec::new(),
    })?;
    println!("{} {} global rules saved.", "OK".green().bold(), count);
    Ok(())
}

/// Run the rules set-cli command
pub fn run_rules_set_cli(engine: &SyncOrchestrator, cli: &str, rules: Vec<String>) -> Result<()> {
    let count = rules.len();
    ccm_core::PatternMatcher::compile(&[] as &[String], &rules)?;
    engine.settings().update_ignore_rules(IgnoreRulesUpdate {
        global: None,
        per_cli: vec![(cli.to_string(), rules)],
    })?;
    println!("{} {} rules saved for {}.", "OK".green().bold(), count, cli.cyan());
    Ok(())
}
