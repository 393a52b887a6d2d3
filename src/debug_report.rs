use flatmetric::{DecomposeVerbose, Engine};

/// ANSI styling that collapses to plain text when color is off.
struct Style {
    enabled: bool,
}

impl Style {
    const RESET: &'static str = "\x1b[0m";
    const DIM: &'static str = "\x1b[2m";
    const BOLD_GREEN: &'static str = "\x1b[1;32m";
    const RED: &'static str = "\x1b[31m";
    const YELLOW: &'static str = "\x1b[33m";
    const BLUE: &'static str = "\x1b[34m";
    const CYAN: &'static str = "\x1b[36m";

    fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn wrap(&self, code: &str, s: impl AsRef<str>) -> String {
        if self.enabled { format!("{code}{}{}", s.as_ref(), Self::RESET) } else { s.as_ref().to_string() }
    }

    fn header(&self, title: &str) -> String {
        self.wrap(Self::DIM, format!("━━━ {title} ━━━"))
    }
}

pub fn print_templates(engine: &Engine, color: bool) {
    let style = Style::new(color);
    println!("{}", style.header("Templates"));

    let mut any = false;
    for candidate in engine.candidates() {
        any = true;
        let filter = if candidate.spec.is_catch_all() { "(catch-all)" } else { candidate.spec.filter.as_str() };
        println!(
            "  [{}] {} {} {}",
            candidate.rank,
            style.wrap(Style::YELLOW, filter),
            style.wrap(Style::CYAN, &candidate.spec.template),
            style.wrap(Style::DIM, &candidate.spec.tagstring),
        );
    }
    if !any {
        println!("  {}", style.wrap(Style::DIM, "No templates configured"));
    }

    match engine.fallback() {
        Some(template) => {
            println!("  {} {}", style.wrap(Style::BLUE, "fallback"), template.pattern(engine.separator()))
        }
        None => println!("  {}", style.wrap(Style::DIM, "No fallback template")),
    }
}

pub fn print_line(res: &DecomposeVerbose, color: bool) {
    let style = Style::new(color);
    println!("\n{}", style.header(&format!("Line \"{}\"", res.line)));

    let Some(selection) = &res.selection else {
        println!("  {}", style.wrap(Style::DIM, "No template applies (no filter matched, no catch-all, no fallback)"));
        return;
    };

    let origin = match selection.rank {
        Some(rank) => format!("template [{rank}]"),
        None => "fallback".to_string(),
    };
    println!("  {} │ {}", style.wrap(Style::BLUE, origin), style.wrap(Style::CYAN, &selection.pattern));

    match &res.outcome {
        Some(Ok(out)) => {
            println!("    measurement: {}", style.wrap(Style::BOLD_GREEN, &out.measurement));
            for (key, value) in &out.tags {
                println!("    tag: {}={value}", style.wrap(Style::YELLOW, key));
            }
            println!("    field: {}", style.wrap(Style::BOLD_GREEN, &out.field));
        }
        Some(Err(err)) => println!("    {}", style.wrap(Style::RED, format!("✗ {err}"))),
        None => {}
    }

    println!("    {}", style.wrap(Style::DIM, format!("{:?}", res.elapsed)));
}
