use tracing::Level;

fn parse_level(level: &str) -> Option<Level> {
    level.trim().parse::<Level>().ok()
}

/// Install the stderr subscriber. Unknown level names fall back to `info`.
pub fn init_tracing(level: &str) {
    let parsed = parse_level(level);
    tracing_subscriber::fmt()
        .with_max_level(parsed.unwrap_or(Level::INFO))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if parsed.is_none() {
        tracing::warn!(level, "unknown log level, using info");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names() {
        assert_eq!(parse_level("debug"), Some(Level::DEBUG));
        assert_eq!(parse_level(" WARN "), Some(Level::WARN));
        assert_eq!(parse_level("chatty"), None);
    }
}
