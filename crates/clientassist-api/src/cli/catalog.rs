//! `templates` and `checklists` listings.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use clientassist_core::catalog::Catalogs;
use clientassist_types::catalog::display_name;

const PREVIEW_CHARS: usize = 60;

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::White))
            .collect::<Vec<_>>(),
    );
    table
}

fn footer(count: usize, noun: &str) {
    println!();
    println!(
        "  {} {noun}{}",
        style(count).bold(),
        if count == 1 { "" } else { "s" }
    );
    println!();
}

pub fn list_templates(catalogs: &Catalogs, json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = catalogs
            .templates
            .iter()
            .map(|(key, body)| serde_json::json!({ "key": key, "name": display_name(key), "body": body }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = table(&["Key", "Name", "Preview"]);
    for (key, body) in catalogs.templates.iter() {
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(display_name(key)),
            Cell::new(preview(body)).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    footer(catalogs.templates.len(), "template");
    Ok(())
}

pub fn list_checklists(catalogs: &Catalogs, json: bool) -> Result<()> {
    if json {
        let entries: Vec<_> = catalogs
            .checklists
            .iter()
            .map(|(key, items)| serde_json::json!({ "key": key, "name": display_name(key), "items": items }))
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    let mut table = table(&["Key", "Name", "Items"]);
    for (key, items) in catalogs.checklists.iter() {
        let numbered = items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("{}. {item}", i + 1))
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(key).fg(Color::Cyan),
            Cell::new(display_name(key)),
            Cell::new(numbered),
        ]);
    }

    println!();
    println!("{table}");
    footer(catalogs.checklists.len(), "checklist");
    Ok(())
}
