use chunker::ChunkerConfig;
use graph_builder::analyze::AnalyzeOptions;
use knowcode_engine::pipeline::build_from_repo;
use knowledge_store::TraceDirection;
use std::fs;

#[test]
fn analyzes_chunks_and_indexes_a_small_python_repo() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mod.py"),
        "class C:\n    def f(self):\n        pass\n\ndef g():\n    C().f()\n",
    )
    .unwrap();

    let outcome = build_from_repo(dir.path(), &AnalyzeOptions::default(), &ChunkerConfig::default()).unwrap();

    assert!(outcome.store.entity_count() >= 4);
    assert!(!outcome.chunks.is_empty());
    assert!(outcome.lexical.doc_count() > 0);

    let g = outcome.store.search("g").into_iter().find(|e| e.name == "g").expect("function g indexed");
    let callers = outcome.store.trace_calls(&g.id, TraceDirection::Callers, 1, 10);
    assert!(callers.is_empty(), "g is not called by anything in this fixture");
}
