//! Output formatting module

use fleetsheet_app::app::ExportOutcome;

pub fn output_export(outcome: &ExportOutcome) {
    let name = outcome
        .path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| outcome.path.display().to_string());
    println!("{} was created successfully.", name);
    println!("Rows:            {}", outcome.rows);

    if !outcome.band_counts.is_empty() {
        println!("\nInspection recency");
        println!("==================");
        for (band, count) in &outcome.band_counts {
            println!("{:<8} #{}  {}", band.label(), band.color(), count);
        }
    }
}
