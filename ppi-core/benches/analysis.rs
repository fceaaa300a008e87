//! Benchmarks for parsing, component analysis and layout.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use ppi_core::layout::LayoutRequest;
use ppi_core::{compute_layout, parse_gdf, ComponentAnalysis, GeneDictionary, NameMode};

/// A GDF file of `clusters` rings of `ring` nodes each.
fn synthetic_gdf(clusters: usize, ring: usize) -> String {
    let mut gdf = String::from("nodedef>name VARCHAR,label VARCHAR,type VARCHAR\n");
    for c in 0..clusters {
        for i in 0..ring {
            gdf.push_str(&format!(
                "{}_{},'Y{:03}C Y{:03}W',{}\n",
                c,
                i,
                i,
                c,
                if i % 2 == 0 { "reference" } else { "prediction" }
            ));
        }
    }
    gdf.push_str("edgedef>node1 VARCHAR,node2 VARCHAR,weight DOUBLE\n");
    for c in 0..clusters {
        for i in 0..ring {
            gdf.push_str(&format!("{}_{},{}_{},0.5\n", c, i, c, (i + 1) % ring));
        }
    }
    gdf
}

fn bench_parse(c: &mut Criterion) {
    let gdf = synthetic_gdf(100, 20);
    c.bench_function("parse_gdf_2000_nodes", |b| {
        b.iter(|| black_box(parse_gdf(black_box(&gdf))))
    });
}

fn bench_components(c: &mut Criterion) {
    let graph = parse_gdf(&synthetic_gdf(100, 20));
    let dict = GeneDictionary::empty();
    c.bench_function("component_analysis_2000_nodes", |b| {
        b.iter(|| black_box(ComponentAnalysis::new(&graph, NameMode::Systematic, &dict)))
    });
}

fn bench_layout(c: &mut Criterion) {
    let request = LayoutRequest::new(parse_gdf(&synthetic_gdf(10, 10)));
    c.bench_function("layout_100_nodes", |b| {
        b.iter(|| black_box(compute_layout(&request)))
    });
}

criterion_group!(benches, bench_parse, bench_components, bench_layout);
criterion_main!(benches);
