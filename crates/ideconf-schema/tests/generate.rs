use ideconf_options::{OptionEnum, Options, RegistryBuilder, RegistryCache};
use ideconf_schema::{
    CatalogEntry, FactoryEntry, PluginSection, SchemaCatalog, SchemaGenerator, SchemaOptions,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

#[derive(Default)]
struct FooOptions {
    bar: String,
}

impl Options for FooOptions {
    fn describe(registry: &mut RegistryBuilder<Self>) {
        registry.string("bar", |o, v| o.bar = v);
    }
}

#[derive(Clone, Copy)]
enum Scope {
    Package,
    Method,
}

impl OptionEnum for Scope {
    const VARIANTS: &'static [&'static str] = &["package", "method"];

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "package" => Some(Self::Package),
            "method" => Some(Self::Method),
            _ => None,
        }
    }
}

#[derive(Default)]
struct TestOptions {
    scope: Option<Scope>,
    fork_count: i64,
    env: Vec<(String, String)>,
    vm_parameters: Vec<String>,
}

impl Options for TestOptions {
    fn describe(registry: &mut RegistryBuilder<Self>) {
        registry
            .enumeration("scope", |o, v: Scope| o.scope = Some(v))
            .integer("forkCount", |o, v| o.fork_count = v)
            .map("env", |o| &mut o.env)
            .collection("vmParameters", |o| &mut o.vm_parameters);
    }
}

#[derive(Default)]
struct GradleSettings {
    offline: bool,
}

impl Options for GradleSettings {
    fn describe(registry: &mut RegistryBuilder<Self>) {
        registry.boolean("offline", |o, v| o.offline = v);
    }
}

fn generate(catalog: &SchemaCatalog) -> Value {
    let cache = RegistryCache::new();
    let text = SchemaGenerator::new(&cache).generate(catalog);
    serde_json::from_str(&text).unwrap()
}

fn foo_entry() -> CatalogEntry {
    CatalogEntry::new("Foo", "Foo")
        .with_factory(FactoryEntry::new("Foo", "Foo").with_options::<FooOptions>())
}

#[test]
fn test_single_factory_end_to_end() {
    let schema = generate(&SchemaCatalog::new().with_type(foo_entry()));

    let foo = &schema["runConfigurationDefinitions"]["foo"];
    assert_eq!(foo["properties"]["bar"]["type"], "string");
    assert_eq!(foo["type"], json!(["array", "object"]));
    assert_eq!(
        foo["items"]["$ref"],
        "#/runConfigurationDefinitions/foo"
    );
    assert_eq!(foo["additionalProperties"], false);
    assert_eq!(
        schema["properties"]["runConfigurations"]["properties"]["foo"]["$ref"],
        "#/runConfigurationDefinitions/foo"
    );
}

#[test]
fn test_root_shape() {
    let schema = generate(&SchemaCatalog::new());
    assert_eq!(schema["$schema"], "http://json-schema.org/draft-07/schema#");
    assert_eq!(schema["$id"], "ideconf.schema.json");
    assert_eq!(schema["type"], "object");
    assert_eq!(schema["additionalProperties"], false);
    assert_eq!(schema["runConfigurationDefinitions"], json!({}));
    assert_eq!(schema["runConfigurationTemplateDefinitions"], json!({}));
    assert_eq!(
        schema["properties"]["runConfigurations"]["additionalProperties"],
        false
    );
    assert_eq!(schema["properties"]["plugins"]["type"], "object");
}

#[test]
fn test_templates_are_object_only() {
    let schema = generate(&SchemaCatalog::new().with_type(foo_entry()));

    let template = &schema["runConfigurationTemplateDefinitions"]["foo"];
    assert_eq!(template["type"], "object");
    assert!(template.get("items").is_none());
    assert_eq!(template["properties"]["bar"]["type"], "string");
    assert_eq!(
        schema["properties"]["runConfigurations"]["properties"]["templates"]["properties"]["foo"]
            ["$ref"],
        "#/runConfigurationTemplateDefinitions/foo"
    );
}

#[test]
fn test_entry_without_factories_is_skipped() {
    let catalog = SchemaCatalog::new()
        .with_type(CatalogEntry::new("Broken", "Broken"))
        .with_type(foo_entry());
    let schema = generate(&catalog);

    let definitions = schema["runConfigurationDefinitions"].as_object().unwrap();
    assert_eq!(definitions.keys().collect::<Vec<_>>(), vec!["foo"]);
    let properties = schema["properties"]["runConfigurations"]["properties"]
        .as_object()
        .unwrap();
    assert!(properties.get("broken").is_none());
    assert!(properties.get("foo").is_some());
}

#[test]
fn test_unusable_identifiers_are_skipped() {
    let catalog = SchemaCatalog::new()
        .with_type(
            CatalogEntry::new("RunConfigurationType", "Empty")
                .with_factory(FactoryEntry::new("x", "x")),
        )
        .with_type(
            CatalogEntry::new("bad/id", "Unsafe").with_factory(FactoryEntry::new("y", "y")),
        )
        .with_type(foo_entry())
        .with_type(
            CatalogEntry::new("FooType", "Foo again").with_factory(FactoryEntry::new("z", "z")),
        );
    let schema = generate(&catalog);

    let definitions = schema["runConfigurationDefinitions"].as_object().unwrap();
    assert_eq!(definitions.len(), 1);
    assert_eq!(
        definitions["foo"]["description"],
        "Foo",
        "the first entry named foo is kept"
    );
}

#[test]
fn test_multiple_factories_use_grouping_definition() {
    let entry = CatalogEntry::new("JUnitTestRunConfigurationType", "JUnit")
        .with_description("JUnit tests")
        .with_factory(FactoryEntry::new("Class", "Test class").with_options::<TestOptions>())
        .with_factory(FactoryEntry::new("Package", "Test package"));
    let schema = generate(&SchemaCatalog::new().with_type(entry));

    let definitions = &schema["runConfigurationDefinitions"];
    let group = &definitions["junitTest"];
    assert_eq!(group["type"], "object");
    assert_eq!(group["description"], "JUnit tests");
    assert_eq!(
        group["properties"]["class"]["$ref"],
        "#/runConfigurationDefinitions/junitTest-class"
    );
    assert_eq!(
        group["properties"]["package"]["$ref"],
        "#/runConfigurationDefinitions/junitTest-package"
    );

    let class = &definitions["junitTest-class"];
    assert_eq!(class["description"], "Test class");
    assert_eq!(
        class["items"]["$ref"],
        "#/runConfigurationDefinitions/junitTest-class"
    );
    assert_eq!(
        class["properties"],
        json!({
            "scope": {"type": "string", "enum": ["package", "method"]},
            "forkCount": {"type": "integer"},
            "env": {"type": "object", "additionalProperties": {"type": "string"}},
            "vmParameters": {"type": "array", "items": {"type": "string"}},
        })
    );

    let templates = &schema["runConfigurationTemplateDefinitions"];
    assert_eq!(
        templates["junitTest"]["properties"]["class"]["$ref"],
        "#/runConfigurationTemplateDefinitions/junitTest-class"
    );
    assert_eq!(templates["junitTest-package"]["type"], "object");
}

#[test]
fn test_colliding_factory_names_skip_the_entry() {
    let catalog = SchemaCatalog::new()
        .with_type(
            CatalogEntry::new("Spring", "Spring")
                .with_factory(FactoryEntry::new("spring-boot", "Spring Boot"))
                .with_factory(FactoryEntry::new("SpringBoot", "Spring Boot (legacy)")),
        )
        .with_type(foo_entry());
    let schema = generate(&catalog);

    for bucket in ["runConfigurationDefinitions", "runConfigurationTemplateDefinitions"] {
        let definitions = schema[bucket].as_object().unwrap();
        assert_eq!(definitions.keys().collect::<Vec<_>>(), vec!["foo"], "{bucket}");
    }
    let properties = schema["properties"]["runConfigurations"]["properties"]
        .as_object()
        .unwrap();
    assert!(properties.get("spring").is_none());
    assert!(properties.get("foo").is_some());
}

#[test]
fn test_factory_without_options_uses_base_properties() {
    let entry = CatalogEntry::new("ShellScript", "Shell Script")
        .with_factory(FactoryEntry::new("ShellScript", "Shell Script"));
    let schema = generate(&SchemaCatalog::new().with_type(entry));

    let properties = schema["runConfigurationDefinitions"]["shellScript"]["properties"]
        .as_object()
        .unwrap();
    let mut names: Vec<_> = properties.keys().map(String::as_str).collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec![
            "allowRunningInParallel",
            "logFiles",
            "name",
            "showConsoleOnStdErr",
            "showConsoleOnStdOut",
        ]
    );
    assert_eq!(properties["showConsoleOnStdOut"]["type"], "boolean");
    assert_eq!(properties["logFiles"]["type"], "array");
}

#[test]
fn test_property_filter() {
    let entry = CatalogEntry::new("Tests", "Tests")
        .with_factory(FactoryEntry::new("Tests", "Tests").with_options::<TestOptions>());
    let cache = RegistryCache::new();
    let text = SchemaGenerator::new(&cache)
        .with_property_filter(|_, shape| shape.name != "forkCount")
        .generate(&SchemaCatalog::new().with_type(entry));
    let schema: Value = serde_json::from_str(&text).unwrap();

    let properties = &schema["runConfigurationDefinitions"]["tests"]["properties"];
    assert!(properties.get("forkCount").is_none());
    assert!(properties.get("scope").is_some());
}

#[test]
fn test_plugin_sections() {
    let catalog = SchemaCatalog::new()
        .with_plugin(PluginSection::new::<GradleSettings>("gradle").with_description("Gradle"))
        .with_plugin(PluginSection::new::<GradleSettings>("bad\"id"));
    let schema = generate(&catalog);

    let plugins = schema["properties"]["plugins"]["properties"]
        .as_object()
        .unwrap();
    assert_eq!(plugins.len(), 1);
    assert_eq!(
        plugins["gradle"],
        json!({
            "type": "object",
            "description": "Gradle",
            "properties": {"offline": {"type": "boolean"}},
            "additionalProperties": false,
        })
    );
}

#[test]
fn test_compact_and_pretty_output_agree() {
    let catalog = SchemaCatalog::new().with_type(foo_entry()).with_type(
        CatalogEntry::new("Tests", "Tests")
            .with_factory(FactoryEntry::new("Unit", "Unit").with_options::<TestOptions>())
            .with_factory(FactoryEntry::new("Integration", "Integration")),
    );
    let cache = RegistryCache::new();

    let pretty = SchemaGenerator::new(&cache).generate(&catalog);
    let compact = SchemaGenerator::new(&cache)
        .with_options(SchemaOptions {
            indent: None,
            ..SchemaOptions::default()
        })
        .generate(&catalog);

    assert!(pretty.contains('\n'));
    assert!(!compact.contains('\n'));
    let pretty: Value = serde_json::from_str(&pretty).unwrap();
    let compact: Value = serde_json::from_str(&compact).unwrap();
    assert_eq!(pretty, compact);
}
