use stories_core::Viewer;

const VIEWER_KEY: &str = "stories_viewer";

fn parse_viewer(raw: &str) -> Option<Viewer> {
    let viewer = serde_json::from_str::<Viewer>(raw).ok()?;
    if viewer.id.trim().is_empty() {
        return None;
    }
    Some(viewer)
}

fn local_storage() -> Result<web_sys::Storage, String> {
    let window = web_sys::window().ok_or_else(|| "window is not available".to_string())?;
    window
        .local_storage()
        .map_err(|_| "failed to access localStorage".to_string())?
        .ok_or_else(|| "localStorage is not available".to_string())
}

pub(crate) fn load_viewer() -> Option<Viewer> {
    let storage = local_storage().ok()?;
    let raw = storage.get_item(VIEWER_KEY).ok()??;
    parse_viewer(&raw)
}

pub(crate) fn save_viewer(viewer: &Viewer) -> Result<(), String> {
    let storage = local_storage()?;
    let raw = serde_json::to_string(viewer).map_err(|_| "failed to serialize viewer".to_string())?;
    storage
        .set_item(VIEWER_KEY, &raw)
        .map_err(|_| "failed to save viewer".to_string())
}

pub(crate) fn clear_viewer() -> Result<(), String> {
    local_storage()?
        .remove_item(VIEWER_KEY)
        .map_err(|_| "failed to clear viewer".to_string())
}
