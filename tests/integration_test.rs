use pretty_assertions::assert_eq;
use raml_scaffold::{
    assembler::{GenerateOptions, SchemaOrder, FOOTER, HEADER},
    error::ScaffoldError,
    loader::SpecLoader,
    scaffold::Scaffold,
    serializer::{render_lines, serialize_yaml},
};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn generate(name: &str, options: GenerateOptions) -> Vec<String> {
    let spec = SpecLoader::load_file(&fixture(name)).expect("Failed to load fixture");
    Scaffold::new(options)
        .expect("Failed to build scaffold")
        .generate(&spec)
        .expect("Failed to generate scaffold")
}

/// Verb and route pattern of a fragment: `  app.get('/x', ...` gives `("get", "/x")`
fn route_of(fragment: &str) -> (&str, &str) {
    let verb = fragment
        .trim_start()
        .strip_prefix("app.")
        .and_then(|rest| rest.split('(').next())
        .unwrap_or_default();
    let pattern = fragment.split('\'').nth(1).unwrap_or_default();
    (verb, pattern)
}

#[test]
fn test_store_end_to_end() {
    let output = generate("store.raml", GenerateOptions::default());

    assert_eq!(output.first().map(String::as_str), Some(HEADER));
    assert_eq!(output.last().map(String::as_str), Some(FOOTER));

    // Schemas come first, in discovery order
    assert!(output[1].starts_with("  var Product = new Schema({"));
    assert!(output[2].starts_with("  var Order = new Schema({"));

    let routes: Vec<(&str, &str)> = output[3..output.len() - 1]
        .iter()
        .map(|fragment| route_of(fragment))
        .collect();
    assert_eq!(
        routes,
        vec![
            ("get", "/products"),
            ("post", "/products"),
            ("get", "/products/:productId"),
            ("put", "/products/:productId"),
            ("delete", "/products/:productId"),
            ("get", "/orders"),
        ]
    );
}

#[test]
fn test_store_schema_declarations() {
    let output = generate("store.raml", GenerateOptions::default());

    let product = &output[1];
    assert!(product.contains("\"price\": {\n        \"type\": \"Number\"\n    }"));
    assert!(product.contains("\"stock\": {\n        \"type\": \"Number\"\n    }"));
    assert!(product.contains("var ProductModel = mongoose.model(\"Product\", Product);"));

    let order = &output[2];
    assert!(order.contains("\"status\": {\n        \"type\": \"String\"\n    }"));
    assert!(order.contains(
        "\"total\": {\n        \"type\": \"Number\",\n        \"required\": true\n    }"
    ));
}

#[test]
fn test_store_fragments() {
    let output = generate("store.raml", GenerateOptions::default());
    let fragments = &output[3..output.len() - 1];

    // POST copies the response schema's fields, not the narrower request body's
    assert!(fragments[1].contains(
        "        id: req.body.id,\n        name: req.body.name,\n        price: req.body.price,\n        stock: req.body.stock\n"
    ));

    assert!(fragments[2]
        .contains("ProductModel.find({ productId: req.params.productId }, function"));

    // No response schema on PUT, so the request body supplies the fields
    assert!(fragments[3]
        .contains("      item.name = req.body.name;\n      item.price = req.body.price;\n"));
    assert!(fragments[3].contains("return res.send(item);"));

    assert_eq!(fragments[4].matches("req.params.productId").count(), 1);

    assert!(fragments[5].contains("OrderModel.find(function (err, items) {"));
}

#[test]
fn test_legacy_order_puts_latest_schema_first() {
    let output = generate(
        "store.raml",
        GenerateOptions {
            schema_order: SchemaOrder::Legacy,
        },
    );
    assert!(output[1].starts_with("  var Order = new Schema({"));
    assert!(output[2].starts_with("  var Product = new Schema({"));
}

#[test]
fn test_rendered_output_is_stable() {
    let first = render_lines(&generate("store.raml", GenerateOptions::default()));
    let second = render_lines(&generate("store.raml", GenerateOptions::default()));
    assert_eq!(first, second);
    assert!(first.starts_with("function setupScaffold(app) {\n\n  var Product"));
    assert!(first.ends_with("  });\n}\n\n"));
}

#[test]
fn test_schema_dump() {
    let spec = SpecLoader::load_file(&fixture("store.raml")).unwrap();
    let state = Scaffold::new(GenerateOptions::default())
        .unwrap()
        .collect(&spec)
        .unwrap();

    assert_eq!(state.schemas.names(), vec!["Product", "Order"]);

    let yaml = serialize_yaml(&state.schemas).unwrap();
    assert!(yaml.starts_with("Product:\n"));
    assert!(yaml.contains("Order:\n"));
}

#[test]
fn test_missing_required_property_fails_loudly() {
    let spec = SpecLoader::load_file(&fixture("bad_required.raml")).unwrap();
    let result = Scaffold::new(GenerateOptions::default())
        .unwrap()
        .generate(&spec);

    match result {
        Err(ScaffoldError::MissingRequiredProperty { property }) => assert_eq!(property, "size"),
        other => panic!("expected MissingRequiredProperty, got {:?}", other),
    }
}

#[test]
fn test_missing_spec_file() {
    let result = SpecLoader::load_file(&fixture("does_not_exist.raml"));
    assert!(matches!(result, Err(ScaffoldError::Io { .. })));
}

#[test]
fn test_raml_types_optional_properties() {
    let output = generate("catalog.raml", GenerateOptions::default());

    let expected_product = r#"  var Product = new Schema({
    "name": {
        "type": "String",
        "required": true
    },
    "sku": {
        "type": "String"
    },
    "price": {
        "type": "Number",
        "required": true
    }
}, { _id: false }  );
  var ProductModel = mongoose.model("Product", Product);"#;
    assert_eq!(output[1], expected_product);
    assert!(output[2].starts_with("  var Size = new Schema({"));

    let post = output
        .iter()
        .find(|fragment| route_of(fragment) == ("post", "/products"))
        .expect("POST /products fragment");
    assert!(post.contains("        sku: req.body.sku,\n"));
    assert!(post.contains("        price: req.body.price\n"));
    assert!(!post.contains('?'));
}

#[test]
fn test_zes_plurals_keep_their_stem() {
    let spec = SpecLoader::load_file(&fixture("catalog.raml")).unwrap();
    let state = Scaffold::new(GenerateOptions::default())
        .unwrap()
        .collect(&spec)
        .unwrap();

    assert_eq!(state.schemas.names(), vec!["Product", "Size"]);
}
