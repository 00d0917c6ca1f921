use portal_scene::SceneConfig;

fn main() -> anyhow::Result<()> {
    portal_scene::run(SceneConfig::default())
}
