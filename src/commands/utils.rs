use crate::utils::config::SCHEMA_VERSION;

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Heap Histo Report Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string            - Schema version (e.g., '1.0.0')");
        println!("  generated_at: string       - ISO 8601 timestamp");
        println!("  limit: number?             - Row cap (null = all classes)");
        println!("  class_count: number        - Distinct classes accumulated");
        println!("  total_instances: number    - Instances across all classes");
        println!("  total_bytes: number        - Shallow bytes across all classes");
        println!("  rows: array                - Classes ranked by bytes, count, name");
        println!("    rank: number             - 1-based position");
        println!("    class: string|number     - Class name or numeric class id");
        println!("    instance_count: number   - Instances of the class");
        println!("    total_shallow_bytes: number - Shallow bytes of the class");
        println!("    percentage: number       - Share of total bytes");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Heap Histo v{}", env!("CARGO_PKG_VERSION"));
    println!("Report Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Class histograms over heap snapshot instances.");
}
