use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::dispatch::InvocationOutcome;

pub fn render_outcome_table(outcome: &InvocationOutcome) -> String {
    let mut summary = Vec::new();
    summary.push(format!("disposition: {:?}", outcome.disposition));
    if let Some(action) = outcome.action {
        summary.push(format!("action: {action}"));
    }
    if let Some(element) = &outcome.element {
        summary.push(format!("element: {element}"));
    }
    if let Some(peer) = &outcome.peer {
        summary.push(format!("peer: {peer}"));
    }
    let header = summary.join(" | ");

    if outcome.updates.is_empty() {
        return header;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Resource", "Old Cost", "New Cost"]);

    for update in &outcome.updates {
        let new_cost_cell = if update.new_cost > update.old_cost {
            Cell::new(update.new_cost).fg(Color::Red)
        } else {
            Cell::new(update.new_cost).fg(Color::Green)
        };
        table.add_row(Row::from(vec![
            Cell::new(&update.resource_name),
            Cell::new(update.old_cost),
            new_cost_cell,
        ]));
    }

    format!("{header}\n{table}")
}
