/// Navigation and boilerplate fragments scraped alongside listing content.
pub const NOISE_KEYWORDS: &[&str] = &[
    "Menu",
    "Login",
    "Sign Up",
    "Shortlist",
    "Support",
    "Download App",
    "Play Store",
    "App Store",
    "Follow us",
    "amber ©",
    "Company",
    "Discover",
    "Share Listing",
    "Favorites",
    "Add a Property",
];

/// Lines at least this long are treated as content even if they mention a
/// blocklisted word.
const MAX_NOISE_LINE: usize = 100;

/// Drop short lines that carry a blocklisted keyword. Heading lines are kept:
/// segmentation needs them.
pub fn remove_navigation_noise(text: &str, extra_keywords: &[String]) -> String {
    text.lines()
        .filter(|line| !is_noise(line, extra_keywords))
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_noise(line: &str, extra_keywords: &[String]) -> bool {
    if line.chars().count() >= MAX_NOISE_LINE || line.trim_start().starts_with('#') {
        return false;
    }
    NOISE_KEYWORDS.iter().any(|kw| line.contains(kw))
        || extra_keywords.iter().any(|kw| !kw.is_empty() && line.contains(kw.as_str()))
}
