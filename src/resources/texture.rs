use anyhow::Context as _;

use crate::data_structures::texture;

/// Resolves `file_name` against the URL of the hosting page.
#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no window")?;
    let href = window
        .location()
        .href()
        .map_err(|e| anyhow::anyhow!("cannot read page location: {:?}", e))?;
    let base = reqwest::Url::parse(&href)?;
    Ok(base.join(file_name)?)
}

/// `./assets` when it exists, otherwise the copy made at build time.
#[cfg(not(target_arch = "wasm32"))]
fn asset_dir() -> std::path::PathBuf {
    let local = std::path::Path::new("./").join("assets");
    if local.is_dir() {
        local
    } else {
        std::path::PathBuf::from(env!("PORTAL_SCENE_ASSET_DIR"))
    }
}

/// Reads an asset: from the asset directory natively, over HTTP relative to the page on the web.
pub async fn load_binary(file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(file_name)?;
        let response = reqwest::get(url).await?.error_for_status()?;
        response.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = asset_dir().join(file_name);
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("cannot read {}", path.display()))?
    };

    Ok(data)
}

pub async fn load_texture(
    file_name: &str,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
) -> anyhow::Result<texture::Texture> {
    let data = load_binary(file_name).await?;
    let format = std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str());
    texture::Texture::from_bytes(device, queue, &data, file_name, format)
}
