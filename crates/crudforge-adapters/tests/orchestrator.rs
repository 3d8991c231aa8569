//! End-to-end orchestrator tests over the in-memory adapters.

use std::path::PathBuf;

use crudforge_adapters::{
    MemoryFilesystem, MemoryMenuRegistry, MemoryStore, NullRouteCache, RecordingMigrationRunner,
};
use crudforge_core::application::ports::{ScaffoldFilter, ScaffoldStore};
use crudforge_core::domain::{FieldSpec, NamingResolver, ScaffoldPayload};
use crudforge_core::prelude::{ScaffoldService, ServiceConfig};

struct Harness {
    service: ScaffoldService,
    fs: MemoryFilesystem,
    store: MemoryStore,
    runner: RecordingMigrationRunner,
    menus: MemoryMenuRegistry,
}

fn harness() -> Harness {
    harness_with_runner(RecordingMigrationRunner::new())
}

fn harness_with_runner(runner: RecordingMigrationRunner) -> Harness {
    let fs = MemoryFilesystem::new();
    let store = MemoryStore::new();
    let menus = MemoryMenuRegistry::new();
    let service = ScaffoldService::new(
        Box::new(store.clone()),
        Box::new(fs.clone()),
        Box::new(runner.clone()),
        Box::new(NullRouteCache),
        Box::new(menus.clone()),
        NamingResolver::default(),
        ServiceConfig::new("/host"),
    );
    Harness {
        service,
        fs,
        store,
        runner,
        menus,
    }
}

fn posts_payload(options: &[&str]) -> ScaffoldPayload {
    ScaffoldPayload {
        table_name: "posts".into(),
        timestamps: true,
        create_options: options.iter().map(|s| s.to_string()).collect(),
        fields: vec![
            FieldSpec {
                name: "title".into(),
                sql_type: Some("string".into()),
                ..FieldSpec::default()
            },
            FieldSpec {
                name: "body".into(),
                sql_type: Some("text".into()),
                nullable: true,
                ..FieldSpec::default()
            },
        ],
        ..ScaffoldPayload::default()
    }
}

const ALL_OPTIONS: &[&str] = &[
    "model",
    "migration",
    "controller",
    "migrate",
    "menu_item",
    "api",
    "blade_crud",
    "test_case",
];

#[test]
fn full_generation_produces_every_artifact() {
    let h = harness();
    let outcome = h
        .service
        .create_or_update(&posts_payload(ALL_OPTIONS), None)
        .unwrap();

    // Model: mass-assignment list is exactly the two fields.
    let model = h.fs.read_file("/host/app/Models/Post.php").unwrap();
    assert!(model.contains("protected $fillable = ["));
    assert!(model.contains("        'title',"));
    assert!(model.contains("        'body',"));
    assert!(model.contains(" * @property Carbon|null $created_at"));

    // Migration: id, fields in order, timestamps.
    let migration_path = h
        .fs
        .file_paths()
        .into_iter()
        .find(|p| {
            p.starts_with("/host/database/migrations")
                && p.to_string_lossy().ends_with("_create_posts_table.php")
        })
        .expect("migration written");
    let migration = h.fs.read_file(&migration_path).unwrap();
    assert!(migration.contains("$table->bigIncrements('id');"));
    assert!(migration.contains("$table->string('title');"));
    assert!(migration.contains("$table->text('body')->nullable();"));
    assert!(migration.contains("$table->timestamps();"));

    // Admin controller + admin route.
    assert!(h.fs.read_file("/host/app/Admin/Controllers/PostController.php").is_some());
    let admin_routes = h.fs.read_file("/host/app/Admin/routes.php").unwrap();
    assert!(admin_routes.contains(
        "$router->resource('posts', App\\Admin\\Controllers\\PostController::class);"
    ));

    // API: trait, controller, route.
    assert!(h.fs.read_file("/host/app/Traits/ResponseMapper.php").is_some());
    assert!(h
        .fs
        .read_file("/host/app/Http/Controllers/Api/PostApiController.php")
        .is_some());
    let api_routes = h.fs.read_file("/host/routes/api.php").unwrap();
    assert!(api_routes.contains(
        "Route::apiResource('posts', App\\Http\\Controllers\\Api\\PostApiController::class);"
    ));

    // Web CRUD: controller, views, route.
    assert!(h
        .fs
        .read_file("/host/app/Http/Controllers/PostWebController.php")
        .is_some());
    for view in ["_layout", "index", "_form", "create", "edit", "show"] {
        assert!(
            h.fs.read_file(format!("/host/resources/views/posts/{view}.blade.php"))
                .is_some(),
            "missing view {view}"
        );
    }
    let web_routes = h.fs.read_file("/host/routes/web.php").unwrap();
    assert!(web_routes
        .contains("Route::resource('posts', App\\Http\\Controllers\\PostWebController::class);"));

    // Tests + factory.
    assert!(h.fs.read_file("/host/tests/Pest.php").is_some());
    assert!(h.fs.read_file("/host/tests/Feature/API/PostApiTest.php").is_some());
    assert!(h.fs.read_file("/host/tests/Feature/Web/PostWebTest.php").is_some());
    assert!(h.fs.read_file("/host/tests/Feature/Admin/PostAdminTest.php").is_some());
    assert!(h.fs.read_file("/host/tests/Unit/Models/PostTest.php").is_some());
    assert!(h.fs.read_file("/host/database/factories/PostFactory.php").is_some());

    // Collaborators: migration applied once, menu idempotent by uri.
    assert_eq!(h.runner.applied_runs(), 1);
    assert_eq!(h.menus.entries(), vec![("Posts".to_string(), "posts".to_string())]);

    // The outcome reports the scaffold and a non-empty log.
    assert_eq!(outcome.scaffold.table_name, "posts");
    assert!(!outcome.generated.is_empty());
    assert!(!outcome.log.is_empty());
}

#[test]
fn rerun_backs_up_artifacts_and_keeps_routes_idempotent() {
    let h = harness();
    let first = h
        .service
        .create_or_update(&posts_payload(&["model", "controller", "api"]), None)
        .unwrap();

    let admin_before = h.fs.read_file("/host/app/Admin/routes.php").unwrap();
    let api_before = h.fs.read_file("/host/routes/api.php").unwrap();

    h.service
        .create_or_update(&posts_payload(&["model", "controller", "api"]), Some(first.id))
        .unwrap();

    // Route files are byte-identical after the second merge.
    assert_eq!(h.fs.read_file("/host/app/Admin/routes.php").unwrap(), admin_before);
    assert_eq!(h.fs.read_file("/host/routes/api.php").unwrap(), api_before);

    // Exactly one backup copy of the overwritten model.
    let model_backups: Vec<PathBuf> = h
        .fs
        .file_paths()
        .into_iter()
        .filter(|p| {
            p.starts_with("/host/storage/scaffold_backups")
                && p.file_name().is_some_and(|n| n == "Post.php")
        })
        .collect();
    assert_eq!(model_backups.len(), 1);

    // The live model still exists at its canonical path.
    assert!(h.fs.read_file("/host/app/Models/Post.php").is_some());
}

#[test]
fn migrate_skips_existing_tables_unless_recreate_was_requested() {
    let h = harness_with_runner(RecordingMigrationRunner::new().with_table("posts"));
    let outcome = h
        .service
        .create_or_update(&posts_payload(&["migrate"]), None)
        .unwrap();

    assert_eq!(h.runner.applied_runs(), 0);
    assert!(h.runner.dropped().is_empty());
    assert!(outcome
        .log
        .iter()
        .any(|l| l.contains("migration skipped: table 'posts' already exists")));

    let h = harness_with_runner(RecordingMigrationRunner::new().with_table("posts"));
    let outcome = h
        .service
        .create_or_update(&posts_payload(&["migrate", "recreate_table"]), None)
        .unwrap();

    assert_eq!(h.runner.dropped(), vec!["posts"]);
    assert_eq!(h.runner.applied_runs(), 1);
    assert!(outcome.log.iter().any(|l| l.contains("table 'posts' dropped")));
}

#[test]
fn update_replaces_fields_end_to_end() {
    let h = harness();
    let first = h
        .service
        .create_or_update(&posts_payload(&["model"]), None)
        .unwrap();

    let mut updated = posts_payload(&["model"]);
    updated.fields = vec![FieldSpec {
        name: "headline".into(),
        sql_type: Some("string".into()),
        ..FieldSpec::default()
    }];
    h.service.create_or_update(&updated, Some(first.id)).unwrap();

    // Store round-trip: no orphaned old fields survive the update.
    let record = h.store.load(first.id).unwrap();
    let names: Vec<_> = record.payload.fields.iter().map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["headline"]);

    // The regenerated model reflects only the new field list.
    let model = h.fs.read_file("/host/app/Models/Post.php").unwrap();
    assert!(model.contains("'headline',"));
    assert!(!model.contains("'title',"));
}

#[test]
fn delete_backs_up_files_and_removes_the_record() {
    let h = harness();
    let outcome = h
        .service
        .create_or_update(&posts_payload(&["model", "migration", "controller"]), None)
        .unwrap();

    let deletion = h.service.delete(outcome.id).unwrap();
    assert!(deletion.log.iter().any(|l| l.contains("deleted")));

    // Files are backed up, not silently deleted.
    assert!(h.fs.read_file("/host/app/Models/Post.php").is_none());
    assert!(h
        .fs
        .read_file("/host/app/Admin/Controllers/PostController.php")
        .is_none());
    assert!(h.fs.count_under("/host/storage/scaffold_backups") >= 3);

    assert!(h.store.load(outcome.id).is_err());
    assert!(h.store.list(&ScaffoldFilter::default()).unwrap().is_empty());
}

#[test]
fn batch_regeneration_survives_a_bad_scaffold() {
    let h = harness();

    // One valid scaffold and one stored record that no longer validates.
    h.store.save(posts_payload(&["model"]), None).unwrap();
    h.store
        .save(
            ScaffoldPayload {
                table_name: "broken".into(),
                fields: vec![],
                ..ScaffoldPayload::default()
            },
            None,
        )
        .unwrap();

    let reports = h.service.regenerate_all().unwrap();
    assert_eq!(reports.len(), 2);

    let ok: Vec<_> = reports.iter().filter(|r| r.outcome.is_ok()).collect();
    let failed: Vec<_> = reports.iter().filter(|r| r.outcome.is_err()).collect();
    assert_eq!(ok.len(), 1);
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].table_name, "broken");

    // The valid scaffold still generated its model.
    assert!(h.fs.read_file("/host/app/Models/Post.php").is_some());
}

#[test]
fn relation_scaffold_generates_consistent_names_across_artifacts() {
    let mut payload = posts_payload(&["model", "api", "blade_crud"]);
    payload.fields.push(FieldSpec {
        name: "status_id".into(),
        sql_type: Some("unsignedBigInteger".into()),
        input_type: Some("select".into()),
        options_source: Some("App\\Models\\Status".into()),
        options_label_col: Some("label".into()),
        ..FieldSpec::default()
    });

    let h = harness();
    h.service.create_or_update(&payload, None).unwrap();

    // The relation accessor, validation rule and view rendering all agree
    // on the relation name derived from the option source.
    let model = h.fs.read_file("/host/app/Models/Post.php").unwrap();
    assert!(model.contains("public function status()"));

    let api = h
        .fs
        .read_file("/host/app/Http/Controllers/Api/PostApiController.php")
        .unwrap();
    assert!(api.contains("'relation' => 'status'"));
    assert!(api.contains("(new \\App\\Models\\Status())->getTable()"));

    let index = h
        .fs
        .read_file("/host/resources/views/posts/index.blade.php")
        .unwrap();
    assert!(index.contains("{{ $row->status->label ?? '' }}"));
}
