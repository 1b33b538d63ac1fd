//! Benchmarks for webhook variable resolution.
//!
//! Measures batch resolution across the three expression languages and the
//! JSON flattener on growing payloads.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use webhook_variables::{resolve_all, ExpressionType, GenericVariable};

/// Generate a push-style JSON payload with a specified number of commits.
fn generate_json_payload(num_commits: usize) -> String {
    let commits: Vec<serde_json::Value> = (0..num_commits)
        .map(|i| {
            serde_json::json!({
                "id": format!("commit_{}", i),
                "message": format!("Change number {}", i),
                "author": {"name": "alice", "email": "alice@example.com"}
            })
        })
        .collect();

    serde_json::json!({
        "ref": "refs/heads/main",
        "repository": {"name": "example", "full_name": "acme/example"},
        "commits": commits
    })
    .to_string()
}

fn generate_xml_payload(num_tags: usize) -> String {
    let mut payload = String::from("<push><branch>main</branch>");
    for i in 0..num_tags {
        payload.push_str(&format!("<tag>v0.{}</tag>", i));
    }
    payload.push_str("</push>");
    payload
}

fn bench_jsonpath_scalar(c: &mut Criterion) {
    let payload = generate_json_payload(10);
    let rules = vec![GenericVariable::new(
        "branch",
        ExpressionType::JsonPath,
        "$.ref",
    )];

    c.bench_function("jsonpath_scalar", |b| {
        b.iter(|| resolve_all(black_box(&rules), black_box(&payload), "|", false))
    });
}

fn bench_jsonpath_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("jsonpath_flatten");

    for num_commits in [1, 10, 100] {
        let payload = generate_json_payload(num_commits);
        let rules = vec![GenericVariable::new(
            "commit",
            ExpressionType::JsonPath,
            "$.commits",
        )];

        group.throughput(Throughput::Bytes(payload.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(num_commits),
            &payload,
            |b, payload| b.iter(|| resolve_all(black_box(&rules), black_box(payload), "|", false)),
        );
    }

    group.finish();
}

fn bench_xpath_nodeset(c: &mut Criterion) {
    let payload = generate_xml_payload(20);
    let rules = vec![GenericVariable::new(
        "tag",
        ExpressionType::XPath,
        "/push/tag",
    )];

    c.bench_function("xpath_nodeset", |b| {
        b.iter(|| resolve_all(black_box(&rules), black_box(&payload), "|", false))
    });
}

fn bench_string_part(c: &mut Criterion) {
    let payload = r#"{"text":"deploy, staging|fast|verbose|dry-run"}"#;
    let rules = vec![GenericVariable::new(
        "mode",
        ExpressionType::StringPart,
        "$.2",
    )];

    c.bench_function("string_part", |b| {
        b.iter(|| resolve_all(black_box(&rules), black_box(payload), "|", false))
    });
}

fn bench_mixed_batch(c: &mut Criterion) {
    let payload = generate_json_payload(25);
    let rules = vec![
        GenericVariable::new("branch", ExpressionType::JsonPath, "$.ref"),
        GenericVariable::new("repo", ExpressionType::JsonPath, "$.repository.full_name"),
        GenericVariable::new("commit", ExpressionType::JsonPath, "$.commits"),
        GenericVariable::new("tag", ExpressionType::JsonPath, "$.tag").with_default("none"),
    ];

    c.bench_function("mixed_batch", |b| {
        b.iter(|| resolve_all(black_box(&rules), black_box(&payload), "|", false))
    });
}

criterion_group!(
    benches,
    bench_jsonpath_scalar,
    bench_jsonpath_flatten,
    bench_xpath_nodeset,
    bench_string_part,
    bench_mixed_batch
);
criterion_main!(benches);
