//! End-to-end scene assembly from files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use tabletop_presenter::engine::Engine;
use tabletop_presenter::engine::cards;
use tabletop_presenter::engine::source::SceneSource;
use tabletop_presenter::engine::sprite::{SpriteHandle, SpriteKind};
use tabletop_presenter::error::EngineError;
use tabletop_presenter::renderer::{RenderContext, Renderer};
use tabletop_presenter::types::Point;
use tabletop_presenter::viewport::{Resolution, Viewport};

fn scratch_dir(name: &str) -> PathBuf {
    let id = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("scene_{name}_{}_{id}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn save(path: &Path, w: u32, h: u32, color: [u8; 4]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(w, h, Rgba(color)).save(path).unwrap();
}

const SCENE: &str = r#"{
    "design_resolution": [640, 480],
    "display": {"mode": "windowed", "resolution": [320, 240]},
    "fps": 20,
    "atlases": [
        {"name": "art", "image": "art/sheet.png", "index": "art/index.json", "color_key": "top_left"}
    ],
    "layers": [
        {"index": 0, "sprites": [{"atlas": "art", "sprite_id": "tree", "position": [10, 10]}]}
    ],
    "cards": {"dir": "cards", "sorted": true},
    "hand": {"initial": 2},
    "board": {
        "nodes": "board/nodes.json",
        "edges": "board/edges.json",
        "icon_atlas": "art",
        "label_atlas": "art"
    }
}"#;

/// Lay out a complete scene directory and return the scene file path.
fn fixture(name: &str) -> PathBuf {
    let dir = scratch_dir(name);

    let mut sheet = RgbaImage::from_pixel(40, 20, Rgba([90, 160, 90, 255]));
    for x in [0, 10, 20, 30] {
        sheet.put_pixel(x, 0, Rgba([255, 0, 255, 255]));
    }
    fs::create_dir_all(dir.join("art")).unwrap();
    sheet.save(dir.join("art/sheet.png")).unwrap();
    write(
        &dir.join("art/index.json"),
        r#"[
            {"sprite_id": "castle", "position": [0, 0, 10, 10]},
            {"sprite_id": "A", "position": [10, 0, 10, 10]},
            {"sprite_id": "B", "position": [20, 0, 10, 10]},
            {"sprite_id": "tree", "position": [30, 0, 10, 20], "rotate": true}
        ]"#,
    );

    save(&dir.join("cards/hearts/ace.png"), 20, 30, [200, 0, 0, 255]);
    save(&dir.join("cards/spades/king.png"), 20, 30, [0, 0, 0, 255]);
    save(&dir.join("cards/two.png"), 20, 30, [255, 255, 255, 255]);

    write(
        &dir.join("board/nodes.json"),
        r#"[
            {"sprite_id": "A", "sprite_icon": "castle", "position": [100, 100]},
            {"sprite_id": "B", "sprite_icon": "castle", "position": [400, 100]}
        ]"#,
    );
    write(
        &dir.join("board/edges.json"),
        r#"[
            {"connection": ["A", "B"]},
            {"connection": ["B", "A"], "loop": true}
        ]"#,
    );

    let scene = dir.join("scene.json");
    write(&scene, SCENE);
    scene
}

fn tag(engine: &Engine, handle: SpriteHandle) -> String {
    match engine.registry().get(handle).unwrap().kind() {
        SpriteKind::Card { tag, .. } => tag.clone(),
        other => panic!("not a card: {other:?}"),
    }
}

fn build(scene: &Path) -> Result<(SceneSource, Viewport, Engine), EngineError> {
    let source = SceneSource::load(scene)?;
    let viewport = Viewport::initialize(source.design_resolution, source.display);
    let engine = Engine::build(&source, scene.parent().unwrap(), &viewport)?;
    Ok((source, viewport, engine))
}

#[test]
fn test_scene_builds_layers_hand_and_board() {
    let scene = fixture("full");
    let (source, viewport, engine) = build(&scene).unwrap();

    assert_eq!(source.fps, 20);
    assert_eq!(viewport.actual(), Resolution::new(320, 240));

    // Scene layer at 0, then board connectors, then board nodes.
    let layers = engine.layers();
    assert_eq!(layers.len(), 3);
    let ids = |i: usize| -> Vec<String> {
        layers
            .layer(i)
            .unwrap()
            .sprites()
            .iter()
            .map(|&h| engine.registry().get(h).unwrap().id().to_string())
            .collect()
    };
    assert_eq!(ids(0), vec!["tree"]);
    assert_eq!(ids(1), vec!["AB", "BA", "AB"]);
    assert_eq!(ids(2), vec!["A", "B"]);

    // Rotated atlas entry (10×20 → 20×10) at half scale.
    let tree = engine.registry().find("tree").unwrap();
    let tree = engine.registry().get(tree).unwrap();
    assert_eq!(tree.image().dimensions(), (10, 5));
    assert_eq!(tree.top_left(), Point::new(5.0, 5.0));

    let node = engine.registry().get(engine.registry().find("A").unwrap()).unwrap();
    assert_eq!(node.image().dimensions(), (75, 32));
    assert_eq!(node.top_left(), Point::new(50.0, 50.0));
    assert_eq!(
        node.kind(),
        &SpriteKind::BoardNode {
            icon: "castle".into(),
            anchor: Point::new(87.5, 62.5),
        }
    );

    assert_eq!(engine.hand().len(), 2);
    assert_eq!(engine.draw_pile_len(), 1);
    let tags: Vec<String> = engine
        .hand()
        .iter()
        .map(|h| match engine.registry().get(h).unwrap().kind() {
            SpriteKind::Card { tag, .. } => tag.clone(),
            other => panic!("not a card: {other:?}"),
        })
        .collect();
    assert_eq!(tags, vec!["hearts", "spades"]);
    let first = engine.registry().get(engine.hand().cards()[0]).unwrap();
    assert_eq!(first.original().dimensions(), (10, 15));
    assert!(engine.hand_visible());

    fs::remove_dir_all(scene.parent().unwrap()).ok();
}

#[test]
fn test_scene_renders_to_png() -> anyhow::Result<()> {
    let scene = fixture("render");
    let (_, viewport, mut engine) = build(&scene)?;

    let mut ctx = RenderContext::new(viewport);
    let frame = engine.resolve_frame(&viewport, None);
    // Tree, three connectors, two nodes, then the two hand cards.
    assert_eq!(frame.ops.len(), 1 + 3 + 2 + 2);
    Renderer::rasterize(&frame, &mut ctx);

    let dir = scene.parent().unwrap();
    let out = dir.join("frame.png");
    Renderer::save_png(&ctx, &out)?;
    let decoded = image::open(&out)?;
    assert_eq!((decoded.width(), decoded.height()), (320, 240));

    fs::remove_dir_all(dir)?;
    Ok(())
}

#[test]
fn test_unknown_layer_sprite_is_reported() {
    let scene = fixture("unknown");
    let broken = SCENE.replace(r#""sprite_id": "tree""#, r#""sprite_id": "shrub""#);
    write(&scene, &broken);

    match build(&scene) {
        Err(EngineError::UnknownSprite { id }) => assert_eq!(id, "art/shrub"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("scene with a missing sprite must not build"),
    }
    fs::remove_dir_all(scene.parent().unwrap()).ok();
}

#[test]
fn test_missing_atlas_image_is_fatal() {
    let scene = fixture("fatal");
    fs::remove_file(scene.parent().unwrap().join("art/sheet.png")).unwrap();
    assert!(matches!(build(&scene), Err(EngineError::FatalAsset { .. })));
    fs::remove_dir_all(scene.parent().unwrap()).ok();

    let scene = fixture("badcard");
    write(&scene.parent().unwrap().join("cards/notes.txt"), "not an image");
    assert!(matches!(build(&scene), Err(EngineError::FatalAsset { .. })));
    fs::remove_dir_all(scene.parent().unwrap()).ok();
}

#[test]
fn test_unknown_board_node_in_edge() {
    let scene = fixture("edge");
    write(
        &scene.parent().unwrap().join("board/edges.json"),
        r#"[{"connection": ["A", "Z"]}]"#,
    );
    match build(&scene) {
        Err(EngineError::UnknownSprite { id }) => assert_eq!(id, "Z"),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("edge to an unknown node must not build"),
    }
    fs::remove_dir_all(scene.parent().unwrap()).ok();
}

#[test]
fn test_scene_defaults() {
    let source: SceneSource = serde_json::from_str("{}").unwrap();
    assert_eq!(source.design_resolution, Resolution::HD_1080);
    assert_eq!(source.fps, 30);
    assert!(source.hand.visible);
    assert_eq!(source.hand.initial, 0);
    assert!(source.atlases.is_empty() && source.board.is_none());
}

#[test]
fn test_named_decks_take_cards_by_tag() {
    let scene = fixture("decks");
    write(
        &scene,
        &SCENE.replace(r#""hand": {"initial": 2}"#, r#""hand": {"initial": 0}"#),
    );
    let (_, _, mut engine) = build(&scene).unwrap();
    assert_eq!(engine.draw_pile_len(), 3);

    assert_eq!(engine.create_deck("Hearts", |t| t == "hearts"), 1);
    assert_eq!(engine.deck_len("Hearts"), Some(1));
    assert_eq!(engine.draw_pile_len(), 2);

    // Pile order survives: spades before the untagged root card.
    assert_eq!(engine.create_deck("Others", |t| t != "hearts"), 2);
    assert_eq!(engine.draw_pile_len(), 0);
    let others: Vec<String> = engine
        .deck("Others")
        .unwrap()
        .iter()
        .map(|&h| tag(&engine, h))
        .collect();
    assert_eq!(others, vec!["spades", ""]);

    let spade = engine.draw_from("Others").unwrap();
    let heart = engine.draw_from("Hearts").unwrap();
    assert_eq!(engine.hand().cards(), &[spade, heart]);
    assert_eq!(tag(&engine, heart), "hearts");
    assert_eq!(engine.draw_from("Hearts"), None);
    assert_eq!(engine.deck_len("Hearts"), Some(0));
    assert_eq!(engine.draw_from("Clubs"), None);
    assert_eq!(engine.deck_len("Clubs"), None);
    assert_eq!(engine.hand().len(), 2);

    fs::remove_dir_all(scene.parent().unwrap()).ok();
}

#[test]
fn test_scene_decks_deal_the_initial_hand() {
    let scene = fixture("scene_decks");
    let decked = SCENE
        .replace(
            r#""cards": {"dir": "cards", "sorted": true}"#,
            r#""cards": {"dir": "cards", "sorted": true, "decks": [
                {"name": "Black", "include": ["spades"]},
                {"name": "Rest", "exclude": ["spades"]}
            ]}"#,
        )
        .replace(
            r#""hand": {"initial": 2}"#,
            r#""hand": {"initial": 2, "deck": "Black"}"#,
        );
    write(&scene, &decked);
    let (source, _, engine) = build(&scene).unwrap();

    let decks = &source.cards.as_ref().unwrap().decks;
    assert!(decks[0].accepts("spades") && !decks[0].accepts("hearts"));
    assert!(decks[1].accepts("") && !decks[1].accepts("spades"));

    // Black holds a single card, so dealing stops after one.
    assert_eq!(engine.hand().len(), 1);
    assert_eq!(tag(&engine, engine.hand().cards()[0]), "spades");
    assert_eq!(engine.deck_len("Black"), Some(0));
    assert_eq!(engine.deck_len("Rest"), Some(2));
    assert_eq!(engine.draw_pile_len(), 0);

    fs::remove_dir_all(scene.parent().unwrap()).ok();
}

#[cfg(unix)]
#[test]
fn test_linked_card_directories_are_not_followed() {
    let scene = fixture("symlink");
    let dir = scene.parent().unwrap();
    let cards_dir = dir.join("cards");
    std::os::unix::fs::symlink(&cards_dir, cards_dir.join("hearts/loop")).unwrap();

    let paths = cards::card_paths(&cards_dir, true).unwrap();
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| !p.starts_with(cards_dir.join("hearts/loop"))));

    let (_, _, engine) = build(&scene).unwrap();
    assert_eq!(engine.hand().len() + engine.draw_pile_len(), 3);

    fs::remove_dir_all(dir).ok();
}
