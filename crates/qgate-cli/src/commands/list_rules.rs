//! List rules command implementation.

use qgate_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!("{:<8} {:<28} Description", "Code", "Name");
    println!("{}", "-".repeat(90));

    for rule in all_rules() {
        println!(
            "{:<8} {:<28} {}",
            rule.code(),
            rule.name(),
            rule.description()
        );
    }

    println!("\nPresets:");
    for (name, preset) in [
        ("recommended", Preset::Recommended),
        ("strict", Preset::Strict),
        ("minimal", Preset::Minimal),
    ] {
        let codes: Vec<&str> = preset.rules().iter().map(|r| r.code()).collect();
        println!("  {:<12} - {}", name, codes.join(", "));
    }

    println!("\nUse --rules to run specific rules, e.g.:");
    println!("  qgate check --rules declaration-order,record-shape");
    println!("  qgate check --rules QG001,QG004");
}
