use super::VideoEntry;

/// Cleans a raw search term. Blank input counts as no search at all.
pub fn normalize_search_term(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
}

/// Keeps entries whose name contains `search_term` (case-insensitive) and orders
/// them by lowercase name, then by id.
pub fn list_videos(entries: Vec<VideoEntry>, search_term: Option<&str>) -> Vec<VideoEntry> {
    let needle = normalize_search_term(search_term).map(|term| term.to_lowercase());

    let mut videos: Vec<(String, VideoEntry)> = entries
        .into_iter()
        .map(|entry| (entry.name.to_lowercase(), entry))
        .filter(|(name, _)| match &needle {
            Some(needle) => name.contains(needle.as_str()),
            None => true,
        })
        .collect();

    videos.sort_by(|(a_name, a), (b_name, b)| a_name.cmp(b_name).then(a.id.cmp(&b.id)));

    videos.into_iter().map(|(_, entry)| entry).collect()
}
