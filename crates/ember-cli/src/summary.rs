use std::time::Duration;

use console::Style;
use ember_core::classify::PixelClass;
use ember_core::pipeline::config::PipelineConfig;
use ember_core::pipeline::PipelineReport;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            warning: Style::new().yellow().bold(),
            path: Style::new().underlined(),
        }
    }
}

fn on_off(s: &Styles, enabled: bool) -> String {
    if enabled {
        s.method.apply_to("on").to_string()
    } else {
        s.disabled.apply_to("off").to_string()
    }
}

pub fn print_classify_summary(config: &PipelineConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Ember Fire Classification"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(25)));
    println!();

    for input in &config.inputs {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.path.apply_to(input.display())
        );
    }
    match &config.output_dir {
        Some(dir) => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.path.apply_to(dir.display())
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("next to band 1")
        ),
    }
    if !config.scaling.is_identity() {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Scaling"),
            s.value.apply_to(format!(
                "{} * DN + {}",
                config.scaling.gain, config.scaling.offset
            ))
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Classifier"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Edge mask"),
        on_off(&s, config.classifier.mask_edges)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Compose"),
        s.method.apply_to(&config.classifier.composition)
    );
    println!();

    println!("  {}", s.header.apply_to("Export"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Masks"),
        on_off(&s, config.export.write_masks)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Polygons"),
        on_off(&s, config.export.write_vectors)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Preview"),
        on_off(&s, config.export.write_preview)
    );
    println!();
}

pub fn print_report(report: &PipelineReport, elapsed: Duration) {
    let s = Styles::new();

    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Scene"),
        s.value.apply_to(&report.base_name)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(format!("{} x {}", report.cols, report.rows))
    );
    if report.size_warning {
        let note = if report.mask_edges {
            "smaller than the 61 px window"
        } else {
            "smaller than the 61 px window, edge mask off: results unreliable"
        };
        println!("  {:<14}{}", s.label.apply_to("Warning"), s.warning.apply_to(note));
    }
    println!();

    println!("  {}", s.header.apply_to("Pixels"));
    for class in PixelClass::ALL {
        println!(
            "    {:<16}{}",
            s.label.apply_to(class.label()),
            s.value.apply_to(report.counts.get(class))
        );
    }
    if let Some(n) = report.polygons {
        println!("    {:<16}{}", s.label.apply_to("polygons"), s.value.apply_to(n));
    }
    println!();

    println!("  {}", s.header.apply_to("Written"));
    for path in &report.written {
        println!("    {}", s.path.apply_to(path.display()));
    }
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Elapsed"),
        s.value.apply_to(format!("{:.1}s", elapsed.as_secs_f64()))
    );
}
