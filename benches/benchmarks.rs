//! Performance benchmarks for Tenderdoc.
//!
//! This module contains benchmarks for:
//! - Template expansion with many placeholders and conditionals
//! - Template directory loading
//! - Template document generation
//!
//! Run with: `cargo bench`

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use serde_json::{json, Value};
use tenderdoc::document::{DocumentType, GenerationRequest, TemplateData, TenderContext};
use tenderdoc::generator::TemplateGenerator;
use tenderdoc::template::{expand, TemplateStore};

// ============================================================================
// Mock Data Fixtures
// ============================================================================

mod fixtures {
    use super::*;

    /// A section body with `n` placeholders, every third inside a conditional.
    pub fn generate_body(n: usize) -> String {
        let mut body = String::new();
        for i in 0..n {
            if i % 3 == 0 {
                body.push_str(&format!("{{if field_{i}}}Clause {i}: {{{{field_{i}}}}}. {{endif}}"));
            } else {
                body.push_str(&format!("Item {i} is {{{{field_{i}}}}}. "));
            }
        }
        body
    }

    /// Fill data for [`generate_body`], leaving every fifth key out.
    pub fn generate_data(n: usize) -> TemplateData {
        let mut data = TemplateData::new();
        for i in (0..n).filter(|i| i % 5 != 0) {
            data.insert(format!("field_{i}"), Value::String(format!("value {i}")));
        }
        data
    }

    /// A JSON template file with `sections` sections.
    pub fn generate_template_json(id: &str, sections: usize) -> String {
        let sections: Vec<_> = (0..sections)
            .map(|i| {
                json!({
                    "name": format!("Section {i}"),
                    "required": i % 2 == 0,
                    "description": format!("Description of section {i}"),
                    "body": "{{title}} for {{organization_name}}. {if estimated_value}Value {{estimated_value}} {{currency}}.{endif}",
                })
            })
            .collect();

        json!({ "id": id, "document_type": "proposal", "sections": sections }).to_string()
    }
}

// ============================================================================
// Expansion Benchmarks
// ============================================================================

fn bench_expand(c: &mut Criterion) {
    let mut group = c.benchmark_group("template/expand");

    for n in [10, 100, 500, 1000].iter() {
        let body = fixtures::generate_body(*n);
        let data = fixtures::generate_data(*n);

        group.throughput(Throughput::Elements(*n as u64));
        group.bench_with_input(BenchmarkId::new("placeholders", n), n, |b, _| {
            b.iter(|| black_box(expand(black_box(&body), black_box(&data))));
        });
    }

    group.finish();
}

// ============================================================================
// Store Benchmarks
// ============================================================================

fn bench_store_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("template/store");

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    for num_files in [5, 25, 100].iter() {
        let dir = temp_dir.path().join(format!("templates_{}", num_files));
        std::fs::create_dir_all(&dir).expect("Failed to create template dir");

        for i in 0..*num_files {
            let id = format!("tpl_{i:03}");
            std::fs::write(dir.join(format!("{id}.json")), fixtures::generate_template_json(&id, 8))
                .expect("Failed to write template");
        }

        group.throughput(Throughput::Elements(*num_files as u64));
        group.bench_with_input(BenchmarkId::new("load", num_files), num_files, |b, _| {
            b.iter(|| black_box(TemplateStore::load(black_box(&dir))));
        });
    }

    group.finish();
}

// ============================================================================
// Generation Benchmarks
// ============================================================================

fn bench_template_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("generator/template");

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let tender = TenderContext::new("Harbour dredging")
        .with_organization("Port Authority")
        .with_value(4_500_000.0, "EUR");

    for num_sections in [7, 20, 50].iter() {
        let dir = temp_dir.path().join(format!("sections_{}", num_sections));
        std::fs::create_dir_all(&dir).expect("Failed to create template dir");
        let template = fixtures::generate_template_json("bench", *num_sections);
        std::fs::write(dir.join("bench.json"), template).expect("Failed to write template");

        let generator = TemplateGenerator::new(Arc::new(TemplateStore::load(&dir)));
        let request = GenerationRequest::new("Dredging bid", DocumentType::Proposal)
            .with_requirement("depth", "12m");

        group.throughput(Throughput::Elements(*num_sections as u64));
        group.bench_with_input(BenchmarkId::new("render", num_sections), num_sections, |b, _| {
            b.iter(|| black_box(generator.render(black_box(&request), Some(&tender))));
        });
    }

    group.finish();
}

fn bench_request_parsing(c: &mut Criterion) {
    let raw = json!({
        "title": "Dredging bid",
        "document_type": "proposal",
        "template_id": 7,
        "content_requirements": {"depth": "12m", "vessels": ["hopper", "cutter"]},
        "style_parameters": {"tone": "formal"},
        "include_sections": ["Overview", "Cost"],
    })
    .to_string();

    c.bench_function("request/from_json", |b| {
        b.iter(|| black_box(GenerationRequest::from_json(black_box(&raw))));
    });
}

// ============================================================================
// Criterion Groups and Main
// ============================================================================

criterion_group!(template_benches, bench_expand, bench_store_load,);

criterion_group!(generation_benches, bench_template_generation, bench_request_parsing,);

criterion_main!(template_benches, generation_benches,);
