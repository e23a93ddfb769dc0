use smilegen::Config;
use smilegen::selection::CategoryStats;
use smilegen::store::StoredRating;

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub fn render_status(config: &Config) -> String {
    let mut lines = vec![
        "◆ Smile Generator".to_string(),
        String::new(),
        format!("Version     {}", env!("CARGO_PKG_VERSION")),
        format!("Workspace   {}", config.workspace_dir.display()),
        format!("Config      {}", config.config_path.display()),
        String::new(),
        format!("  Listen       {}:{}", config.server.host, config.server.port),
        format!("  Store        {}", config.store.backend),
        format!("  Image        {}", config.image.backend),
        format!(
            "  Canvas       {}x{}",
            config.image.width, config.image.height
        ),
        format!("  Weighted     {}", on_off(config.selection.weighted)),
        format!("  Max per cat  {}", config.selection.max_per_category),
    ];

    lines.push(match &config.selection.gating {
        Some(gating) => format!(
            "  Gating       {} every {}, {} every {}",
            gating.primary,
            gating.primary_every,
            gating.companion.as_deref().unwrap_or("-"),
            gating.companion_every
        ),
        None => "  Gating       off".to_string(),
    });
    lines.push(format!(
        "  Secret       {}",
        if config.server.uses_default_secret() {
            "✗ built-in (set SMILE_SECRET)"
        } else {
            "✓ configured"
        }
    ));

    lines.push(String::new());
    lines.push("Catalog:".to_string());
    for category in &config.catalog.categories {
        lines.push(format!("  {:12} {} tags", category.name, category.tags.len()));
    }

    lines.join("\n")
}

pub fn render_stats(stats: &[CategoryStats], recent: &[StoredRating]) -> String {
    let mut lines = Vec::new();
    for category in stats {
        lines.push(format!("{}:", category.category));
        for tag in &category.tags {
            lines.push(format!(
                "  {:32} total {:>4}  count {:>3}  avg {:.2}  weight {:.2}",
                tag.tag, tag.total_score, tag.rating_count, tag.average, tag.weight
            ));
        }
    }

    lines.push(String::new());
    if recent.is_empty() {
        lines.push("No ratings yet.".to_string());
    } else {
        lines.push("Recent ratings:".to_string());
        for stored in recent {
            let scene = stored
                .event
                .selections
                .iter()
                .map(|(category, _)| {
                    format!("{category}: {}", stored.event.selections.joined(category))
                })
                .collect::<Vec<_>>()
                .join("; ");
            lines.push(format!(
                "  #{:<4} {}  {}  {scene}",
                stored.id,
                stored.event.rating,
                stored.event.created_at.format("%Y-%m-%d %H:%M")
            ));
        }
    }

    lines.join("\n")
}
