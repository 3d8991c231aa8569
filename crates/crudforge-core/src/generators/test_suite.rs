//! Test-suite generator: Pest feature tests (API, web, admin), a model unit
//! test, and an optional data factory stub.

use crate::domain::{NamingResolver, Scaffold};
use crate::generators::stubs;
use crate::generators::template::TemplateVars;
use crate::generators::{GeneratedArtifact, GeneratorError};

/// Render the test files for a scaffold. `admin_prefix` is the admin panel's
/// route prefix (usually `admin`); `with_factory` adds a null-filled data
/// factory stub.
pub fn generate(
    scaffold: &Scaffold,
    naming: &NamingResolver,
    admin_prefix: &str,
    with_factory: bool,
) -> Result<Vec<GeneratedArtifact>, GeneratorError> {
    let model = scaffold.model_name.short().to_string();
    let model_fqcn = scaffold.model_name.to_string();
    let slug = naming.route_slug(&scaffold.model_name);
    let api_base = format!("/api/{slug}");
    // The admin panel exposes the resource under the same slug the route
    // merge engine registered.
    let admin_base = format!("/{admin_prefix}/{slug}");
    let fillable = scaffold.mass_assignable();

    let mut artifacts = vec![GeneratedArtifact::write_once(
        "tests/Pest.php",
        stubs::PEST_BOOTSTRAP.to_string(),
    )];

    artifacts.push(GeneratedArtifact::new(
        format!("tests/Feature/API/{model}ApiTest.php"),
        stubs::TEST_API.render(
            TemplateVars::new()
                .set("MODEL", model.clone())
                .set("API_BASE", api_base),
        )?,
    ));

    artifacts.push(GeneratedArtifact::new(
        format!("tests/Feature/Web/{model}WebTest.php"),
        stubs::TEST_WEB.render(
            TemplateVars::new()
                .set("MODEL", model.clone())
                .set("MODEL_FQCN", model_fqcn.clone())
                .set("ROUTE_NAME", slug),
        )?,
    ));

    artifacts.push(GeneratedArtifact::new(
        format!("tests/Feature/Admin/{model}AdminTest.php"),
        stubs::TEST_ADMIN.render(
            TemplateVars::new()
                .set("MODEL", model.clone())
                .set("ADMIN_BASE_URI", admin_base),
        )?,
    ));

    let fillable_list = fillable
        .iter()
        .map(|f| format!("'{f}'"))
        .collect::<Vec<_>>()
        .join(", ");
    artifacts.push(GeneratedArtifact::new(
        format!("tests/Unit/Models/{model}Test.php"),
        stubs::TEST_MODEL_UNIT.render(
            TemplateVars::new()
                .set("MODEL", model.clone())
                .set("MODEL_FQCN", model_fqcn.clone())
                .set("TABLE", scaffold.table_name.clone())
                .set("FILLABLE_LIST", fillable_list),
        )?,
    ));

    if with_factory {
        let assignments = fillable
            .iter()
            .map(|f| format!("            '{f}' => null,"))
            .collect::<Vec<_>>()
            .join("\n");
        artifacts.push(GeneratedArtifact::new(
            format!("database/factories/{model}Factory.php"),
            stubs::FACTORY.render(
                TemplateVars::new()
                    .set("MODEL", model)
                    .set("MODEL_FQCN", model_fqcn)
                    .set("ASSIGNMENTS", assignments),
            )?,
        ));
    }

    Ok(artifacts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldSpec, ScaffoldPayload};
    use crate::generators::WritePolicy;
    use std::path::PathBuf;

    fn scaffold() -> Scaffold {
        let payload = ScaffoldPayload {
            table_name: "student_infos".into(),
            fields: vec![
                FieldSpec {
                    name: "name".into(),
                    ..FieldSpec::default()
                },
                FieldSpec {
                    name: "remarks".into(),
                    nullable: true,
                    ..FieldSpec::default()
                },
            ],
            ..ScaffoldPayload::default()
        };
        Scaffold::resolve(&payload, &NamingResolver::default()).unwrap()
    }

    #[test]
    fn emits_bootstrap_four_tests_and_factory() {
        let artifacts =
            generate(&scaffold(), &NamingResolver::default(), "admin", true).unwrap();

        let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("tests/Pest.php"),
                PathBuf::from("tests/Feature/API/StudentInfoApiTest.php"),
                PathBuf::from("tests/Feature/Web/StudentInfoWebTest.php"),
                PathBuf::from("tests/Feature/Admin/StudentInfoAdminTest.php"),
                PathBuf::from("tests/Unit/Models/StudentInfoTest.php"),
                PathBuf::from("database/factories/StudentInfoFactory.php"),
            ]
        );
        assert_eq!(artifacts[0].policy, WritePolicy::SkipIfExists);
    }

    #[test]
    fn tests_target_the_merged_routes() {
        let artifacts =
            generate(&scaffold(), &NamingResolver::default(), "admin", false).unwrap();

        let api = &artifacts[1].content;
        assert!(api.contains("$this->getJson('/api/student-infos');"));
        assert!(api.contains("markTestSkipped"));

        let web = &artifacts[2].content;
        assert!(web.contains("route('student-infos.index')"));
        assert!(web.contains("new \\App\\Models\\StudentInfo()"));

        let admin = &artifacts[3].content;
        assert!(admin.contains("$this->get('/admin/student-infos')->assertOk();"));
        assert!(admin.contains("loginAsAdmin();"));
    }

    #[test]
    fn unit_test_asserts_table_and_fillable() {
        let artifacts =
            generate(&scaffold(), &NamingResolver::default(), "admin", true).unwrap();

        let unit = &artifacts[4].content;
        assert!(unit.contains("expect($m->getTable())->toBe('student_infos');"));
        assert!(unit.contains("foreach (['name', 'remarks'] as $f)"));

        let factory = &artifacts[5].content;
        assert!(factory.contains("class StudentInfoFactory extends Factory"));
        assert!(factory.contains("            'name' => null,"));
        assert!(factory.contains("            'remarks' => null,"));
    }
}
