use dict_core::{
    DictError, DictionaryEngine, EntryId, LookupOutcome, MatchMode, TranslationRecord, MAX_ENTRY_LEN,
};
use proptest::prelude::*;

fn word(s: &[&str]) -> Vec<String> {
    s.iter().map(|x| x.to_string()).collect()
}

fn record(w: &[&str], en: &str, de: &str, translit: &str) -> TranslationRecord {
    TranslationRecord::new(word(w))
        .with_translation("en", en)
        .with_translation("de", de)
        .with_translation("transliteration", translit)
}

/// Three glyph words, one homograph, two languages plus transliteration.
fn glyph_dictionary() -> DictionaryEngine {
    let mut engine = DictionaryEngine::new(true);
    engine
        .populate(
            vec![
                (EntryId::from("d21"), word(&["D21"])),
                (EntryId::from("d21-n35"), word(&["D21", "N35"])),
                (EntryId::from("d21-n35-a"), word(&["D21", "N35"])),
                (EntryId::Int(400), word(&["G17", "D21"])),
            ],
            vec![
                (EntryId::from("d21"), record(&["D21"], "mouth", "Mund", "r")),
                (EntryId::from("d21-n35"), record(&["D21", "N35"], "toward", "zu", "rn")),
                (EntryId::from("d21-n35-a"), record(&["D21", "N35"], "name", "Name", "rn")),
                (EntryId::Int(400), record(&["G17", "D21"], "in the mouth of", "im Munde", "m-r")),
            ],
        )
        .unwrap();
    engine
}

#[test]
fn segmentation_finds_every_contained_entry() {
    let mut engine = DictionaryEngine::new(true);
    engine
        .populate(
            vec![
                (EntryId::Int(1), word(&["a"])),
                (EntryId::Int(2), word(&["a", "b"])),
                (EntryId::Int(3), word(&["a", "b", "a"])),
            ],
            vec![
                (EntryId::Int(1), TranslationRecord::new(word(&["a"])).with_translation("en", "one")),
                (EntryId::Int(2), TranslationRecord::new(word(&["a", "b"])).with_translation("en", "two")),
                (EntryId::Int(3), TranslationRecord::new(word(&["a", "b", "a"])).with_translation("en", "three")),
            ],
        )
        .unwrap();

    let found: Vec<_> = engine
        .segment_matches(&["a", "b", "a"])
        .into_iter()
        .map(|m| (m.span, m.entry_ids))
        .collect();
    assert_eq!(
        found,
        vec![
            ((0, 0), vec![EntryId::Int(1)]),
            ((0, 1), vec![EntryId::Int(2)]),
            ((0, 2), vec![EntryId::Int(3)]),
            ((2, 2), vec![EntryId::Int(1)]),
        ]
    );
}

#[test]
fn homographs_and_overlaps_in_rows() {
    let engine = glyph_dictionary();
    let rows = engine.get_entries_in_sequence(&["g17", "d21", "n35"]).unwrap();
    let summary: Vec<_> = rows.iter().map(|r| (r.span, r.entry_id.to_string())).collect();
    assert_eq!(
        summary,
        vec![
            ((0, 1), "400".to_string()),
            ((1, 1), "d21".to_string()),
            ((1, 2), "d21-n35".to_string()),
            ((1, 2), "d21-n35-a".to_string()),
        ]
    );
}

#[test]
fn unmatched_sequence_is_empty_not_an_error() {
    let engine = glyph_dictionary();
    assert!(engine.segment(&["Z1", "Z2"]).unwrap().is_empty());
}

#[test]
fn error_kinds() {
    let empty = DictionaryEngine::new(true);
    assert!(matches!(empty.segment(&["a"]), Err(DictError::EmptyIndex(_))));

    let mut engine = glyph_dictionary();
    assert!(matches!(
        engine.find_words_by_translation("mouth", Some("fr")),
        Err(DictError::UnsupportedLanguage(_))
    ));
    assert!(matches!(engine.add_entry(&["a"], EntryId::from("")), Err(DictError::Validation(_))));
    assert!(matches!(
        engine.find_matching_words(&["d21"], "fuzzy"),
        Err(DictError::Validation(_))
    ));
}

#[test]
fn search_modes_on_words() {
    let mut engine = DictionaryEngine::new(true);
    let words: [(i64, &str); 3] = [(1, "cat"), (2, "category"), (3, "concatenate")];
    let chars = |w: &str| w.chars().map(|c| c.to_string()).collect::<Vec<_>>();
    engine
        .populate(
            words.iter().map(|(id, w)| (EntryId::Int(*id), chars(*w))),
            words
                .iter()
                .map(|(id, w)| (EntryId::Int(*id), TranslationRecord::new(chars(*w)).with_translation("en", *w))),
        )
        .unwrap();

    let cat = chars("cat");
    assert_eq!(engine.find_matching_words(&cat, "exact").unwrap(), vec![EntryId::Int(1)]);
    assert_eq!(
        engine.find_matching_words(&cat, "starts_with").unwrap(),
        vec![EntryId::Int(1), EntryId::Int(2)]
    );
    assert_eq!(
        engine.find_matching_words(&cat, "contains").unwrap(),
        vec![EntryId::Int(1), EntryId::Int(2), EntryId::Int(3)]
    );
}

fn reload(engine: &DictionaryEngine) -> DictionaryEngine {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("glyphs.json");
    engine.save(&path).unwrap();

    let mut restored = DictionaryEngine::new(true);
    restored.load(&path).unwrap();
    restored
}

#[test]
fn persistence_round_trip() {
    let engine = glyph_dictionary();
    let restored = reload(&engine);

    let queries: [&[&str]; 4] = [&["d21"], &["D21", "N35"], &["g17"], &["g17", "d21", "n35"]];
    for query in queries {
        assert_eq!(restored.lookup(query), engine.lookup(query));
        assert_eq!(restored.segment(query).unwrap(), engine.segment(query).unwrap());
    }
    assert_eq!(restored.languages(), engine.languages());

    let by_translation = |e: &DictionaryEngine| {
        e.find_words_by_translation("mund", Some("de"))
            .unwrap()
            .into_iter()
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(by_translation(&restored), by_translation(&engine));
    assert_eq!(
        restored.find_matching_words(&["d21"], "contains").unwrap(),
        engine.find_matching_words(&["d21"], "contains").unwrap()
    );
    assert_eq!(
        restored.find_matching_words(&["d21"], "contains").unwrap(),
        vec![
            EntryId::from("d21"),
            EntryId::from("d21-n35"),
            EntryId::from("d21-n35-a"),
            EntryId::Int(400),
        ]
    );

    let containing = |e: &DictionaryEngine| {
        e.entries_containing_sequence(&["N35"], MatchMode::Contains)
            .unwrap()
            .into_iter()
            .map(|(id, _)| id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(containing(&restored), containing(&engine));
    assert_eq!(containing(&restored).len(), 2);
}

#[test]
fn integer_ids_survive_reload() {
    let mut engine = DictionaryEngine::new(true);
    engine
        .populate(
            vec![(EntryId::Int(1), word(&["a"])), (EntryId::Int(2), word(&["a", "b"]))],
            vec![
                (EntryId::Int(1), record(&["a"], "one", "eins", "a")),
                (EntryId::Int(2), record(&["a", "b"], "two", "zwei", "ab")),
            ],
        )
        .unwrap();
    let restored = reload(&engine);

    let expected = vec![EntryId::Int(1), EntryId::Int(2)];
    assert_eq!(engine.find_matching_words(&["a"], "contains").unwrap(), expected);
    assert_eq!(restored.find_matching_words(&["a"], "contains").unwrap(), expected);
    assert_eq!(restored.lookup(&["a", "b"]).ids(), &[EntryId::Int(2)]);
}

#[test]
fn longest_entry_survives_reload() {
    let symbols: Vec<String> = (0..MAX_ENTRY_LEN).map(|i| format!("s{}", i)).collect();
    let mut engine = DictionaryEngine::new(true);
    engine
        .populate(
            vec![(EntryId::from("long"), symbols.clone())],
            vec![(
                EntryId::from("long"),
                TranslationRecord::new(symbols.clone()).with_translation("en", "litany"),
            )],
        )
        .unwrap();
    let restored = reload(&engine);

    assert_eq!(restored.lookup(&symbols).ids(), &[EntryId::from("long")]);
    let rows = restored.get_entries_in_sequence(&symbols).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].span, (0, MAX_ENTRY_LEN - 1));

    let mut too_long = symbols;
    too_long.push("extra".into());
    assert!(matches!(
        engine.add_entry(&too_long, EntryId::from("longer")),
        Err(DictError::Validation(_))
    ));
}

#[test]
fn failed_load_keeps_current_state() {
    let mut engine = glyph_dictionary();
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        engine.load(dir.path().join("missing.json")),
        Err(DictError::Persistence { .. })
    ));
    assert!(!engine.lookup(&["d21"]).ids().is_empty());
}

#[test]
fn from_file_or_new_falls_back_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user.json");
    let engine = DictionaryEngine::from_file_or_new(&path, true);
    assert!(!engine.is_populated());

    let populated = glyph_dictionary();
    populated.save(&path).unwrap();
    let reopened = DictionaryEngine::from_file_or_new(&path, true);
    assert!(reopened.is_populated());
    reopened.save_dictionary().unwrap();
}

#[test]
fn diagnostic_lookup_outcomes() {
    let engine = glyph_dictionary();
    assert_eq!(
        engine.has_entry(&["g17", "x"]).unwrap(),
        LookupOutcome::NoPath { last_matched: Some("g17".into()) }
    );
    assert_eq!(
        engine.has_entry(&["g17"]).unwrap(),
        LookupOutcome::NoTerminator { last_matched: "g17".into() }
    );
}

proptest! {
    #[test]
    fn inserted_entry_is_found(
        entry in prop::collection::vec("[a-z][a-z0-9]{0,3}", 1..6),
        id in "[a-z0-9]{1,8}",
    ) {
        let mut engine = DictionaryEngine::new(true);
        engine.add_entry(&entry, EntryId::from(id.as_str())).unwrap();
        prop_assert!(engine.lookup(&entry).ids().contains(&EntryId::from(id.as_str())));
    }
}
