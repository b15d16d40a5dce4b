use criterion::{Criterion, criterion_group, criterion_main};
use personbench_objectdb::{CommitMode, Database, Session};
use personbench_proc_macros::{Entity, NumBytes, Read, Write};
use std::hint::black_box;
use tempfile::tempdir;

#[derive(Debug, Default, Clone, Read, Write, NumBytes, Entity)]
struct TestObject {
    id: u64,
    name: String,
}

fn bench(session: &mut Session, object: &TestObject) {
    black_box(session.save(object).unwrap());
}

fn criterion_benchmark(c: &mut Criterion) {
    let path = tempdir().unwrap();
    let mut db = Database::new(path.path());
    db.create().unwrap();
    db.register_entity::<TestObject>().unwrap();
    let object = TestObject {
        id: 1,
        name: "test".to_string(),
    };

    let mut session = db.session().unwrap();
    c.bench_function("save_autocommit", |b| b.iter(|| bench(&mut session, black_box(&object))));

    let mut session = db.session_with(CommitMode::Explicit).unwrap();
    c.bench_function("save_explicit", |b| b.iter(|| bench(&mut session, black_box(&object))));
    session.commit().unwrap();

    drop(session);
    db.close().unwrap();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
