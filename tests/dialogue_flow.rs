use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use narrative_engine::dialogue::{DialogueTree, GOODBYE_TEXT};
use narrative_engine::sandbox::Sandbox;
use narrative_engine::world::Inventory;
use narrative_engine::{
    Actor, ContentKind, ContentStore, EngineConfig, FrameInput, HookRegistry, Narrative, NarrativeError, QuestEvent,
};

fn data_dir() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

const BROKEN_TREE: &str = r#"{
    "id": "broken_bridge",
    "name": "Broken Bridge",
    "start_node": "start",
    "nodes": [
        {
            "id": "start",
            "text": "The bridge ahead has collapsed.",
            "options": [
                { "text": "Cross anyway.", "next_node": "far_side" },
                { "text": "Turn back.", "action": "end" }
            ]
        }
    ]
}"#;

#[test]
fn villager_advice_hands_out_berries() {
    let config = EngineConfig::default().with_data_dir(data_dir());
    let mut narrative = Narrative::load(&config).unwrap();
    let mut sandbox = Sandbox::new(20);

    narrative.interact("villager", &mut sandbox.context()).unwrap();
    for _ in 0..3 {
        narrative.select_option(0, &mut sandbox.context()).unwrap();
    }
    assert_eq!(narrative.dialogue().current_node_id(), Some("advice"));
    assert_eq!(sandbox.backpack.item_count("berries"), 3);
    assert_eq!(sandbox.notifications.latest(), Some("Received: Berries x3"));

    let outcome = narrative.select_option(0, &mut sandbox.context()).unwrap();
    assert!(outcome.ended);
    assert!(!narrative.is_in_conversation());
}

#[test]
fn villager_shop_is_reported_to_the_caller() {
    let config = EngineConfig::default().with_data_dir(data_dir());
    let mut narrative = Narrative::load(&config).unwrap();
    let mut sandbox = Sandbox::new(20);

    narrative.interact("villager", &mut sandbox.context()).unwrap();
    narrative.select_option(1, &mut sandbox.context()).unwrap();
    let outcome = narrative.select_option(0, &mut sandbox.context()).unwrap();
    assert_eq!(outcome.shop.as_deref(), Some("villager_wares"));
    assert!(outcome.ended);
}

#[test]
fn missing_next_node_keeps_the_conversation_in_place() {
    let mut store = ContentStore::load_from_directory(&data_dir()).unwrap();
    store.dialogues.insert(DialogueTree::from_json(BROKEN_TREE).unwrap()).unwrap();
    let config = EngineConfig::default();
    let mut narrative = Narrative::new(Arc::new(store), HookRegistry::with_builtins(), &config);
    let mut sandbox = Sandbox::new(20);

    narrative
        .start_conversation("broken_bridge", Actor::new("traveller", "Traveller"), &mut sandbox.context())
        .unwrap();
    let err = narrative.select_option(0, &mut sandbox.context()).unwrap_err();
    assert_eq!(
        err,
        NarrativeError::ContentNotFound {
            kind: ContentKind::DialogueNode,
            id: "far_side".to_string(),
        }
    );
    assert_eq!(narrative.dialogue().current_node_id(), Some("start"));
    assert_eq!(narrative.dialogue().visible_options().len(), 2);

    assert!(narrative.select_option(1, &mut sandbox.context()).unwrap().ended);
}

#[test]
fn typing_reveal_and_number_keys() {
    let config = EngineConfig::default().with_data_dir(data_dir()).with_typing_speed(10);
    let mut narrative = Narrative::load(&config).unwrap();
    let mut sandbox = Sandbox::new(20);

    narrative.interact("spectral_guardian", &mut sandbox.context()).unwrap();
    let text = narrative.dialogue().current_node().unwrap().text.clone();

    narrative
        .per_frame_input_tick(FrameInput::default(), Duration::from_millis(50), &mut sandbox.context())
        .unwrap();
    let view = narrative.dialogue().view().unwrap();
    assert_eq!(view.text, text.chars().take(5).collect::<String>());
    assert!(!view.typing_complete);

    narrative
        .per_frame_input_tick(FrameInput::default(), Duration::from_secs(5), &mut sandbox.context())
        .unwrap();
    assert!(narrative.dialogue().view().unwrap().typing_complete);

    // Key 2 leaves
    let outcome = narrative
        .per_frame_input_tick(
            FrameInput { digit: Some(2), skip: false },
            Duration::ZERO,
            &mut sandbox.context(),
        )
        .unwrap()
        .unwrap();
    assert!(outcome.ended);
    assert!(!narrative.is_in_conversation());
}

#[test]
fn offering_tree_replaces_hunger_after_delivery() {
    let config = EngineConfig::default().with_data_dir(data_dir());
    let mut narrative = Narrative::load(&config).unwrap();
    let mut sandbox = Sandbox::new(20);

    narrative.interact("starving_spirit", &mut sandbox.context()).unwrap();
    narrative.select_option(0, &mut sandbox.context()).unwrap();
    assert!(narrative.select_option(0, &mut sandbox.context()).unwrap().ended);
    assert!(narrative.quests().is_active("starving_spirit"));

    let bread = narrative.content().item("bread_honey").unwrap().clone();
    sandbox.backpack.add_item(&bread, 1);
    narrative.record_event(&QuestEvent::deliver("bread_honey", "starving_spirit"), &mut sandbox.context());
    assert_eq!(sandbox.backpack.item_count("bread_honey"), 0);

    narrative.interact("starving_spirit", &mut sandbox.context()).unwrap();
    assert_eq!(narrative.dialogue().current_tree_id(), Some("spirit_offering"));
    assert!(narrative.select_option(0, &mut sandbox.context()).unwrap().ended);
}

#[test]
fn relics_check_routes_on_quest_state() {
    let config = EngineConfig::default().with_data_dir(data_dir());
    let mut narrative = Narrative::load(&config).unwrap();
    let mut sandbox = Sandbox::new(20);
    let elder = || Actor::new("elder_guardian", "Elder Guardian");

    narrative
        .start_conversation("elder_guardian_2", elder(), &mut sandbox.context())
        .unwrap();
    let outcome = narrative.select_option(1, &mut sandbox.context()).unwrap();
    assert_eq!(outcome.node_id.as_deref(), Some("relics_offer"));
    narrative.end_conversation();

    narrative.accept_quest("echoes_of_past", &mut sandbox.context()).unwrap();
    narrative
        .quests_mut()
        .complete_quest("echoes_of_past", &mut sandbox.context())
        .unwrap();
    narrative.accept_quest("lost_relics", &mut sandbox.context()).unwrap();
    narrative
        .quests_mut()
        .complete_quest("lost_relics", &mut sandbox.context())
        .unwrap();

    // Completed: a node with no options, closed by the synthetic goodbye
    narrative
        .start_conversation("elder_guardian_2", elder(), &mut sandbox.context())
        .unwrap();
    let outcome = narrative.select_option(1, &mut sandbox.context()).unwrap();
    assert_eq!(outcome.node_id.as_deref(), Some("relics_done"));
    let texts: Vec<&str> = narrative
        .dialogue()
        .visible_options()
        .iter()
        .map(|o| o.text.as_str())
        .collect();
    assert_eq!(texts, vec![GOODBYE_TEXT]);
    assert!(narrative.select_option(0, &mut sandbox.context()).unwrap().ended);
}
