use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use rotorforge::attack::AttackSummary;
use rotorforge::keyspace::KeySpace;

pub fn print_hold(entries: &[(f64, String, String)]) {
    if entries.is_empty() {
        println!("\nNo candidates were kept.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Key").add_attribute(Attribute::Bold),
        Cell::new("Preview"),
    ]);
    for i in 0..2 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for (rank, (score, preview, key)) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(format!("{:.5}", score)).fg(Color::Cyan),
            Cell::new(key),
            Cell::new(preview),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_summary(summary: &AttackSummary) {
    let p = &summary.progress;
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![Cell::new("Keys"), Cell::new(format!("{} / {}", p.completed_units, p.total_units))]);
    table.add_row(vec![Cell::new("Decrypts"), Cell::new(p.decrypts)]);
    table.add_row(vec![Cell::new("Workers"), Cell::new(summary.workers)]);
    table.add_row(vec![
        Cell::new("Elapsed"),
        Cell::new(format!("{:.2}s", summary.elapsed.as_secs_f64())),
    ]);
    table.add_row(vec![Cell::new("Keys/s"), Cell::new(format!("{:.0}", p.rate()))]);
    if summary.cancelled {
        table.add_row(vec![Cell::new("Status"), Cell::new("cancelled").fg(Color::Red)]);
    }
    println!("\n{}", table);
}

pub fn print_slices(slices: &[KeySpace]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.set_header(vec!["Slice", "Offset", "Keys"]);
    for i in 0..3 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
    for (i, s) in slices.iter().enumerate() {
        table.add_row(vec![Cell::new(i), Cell::new(s.offset()), Cell::new(s.count())]);
    }
    println!("\n{}", table);
}
