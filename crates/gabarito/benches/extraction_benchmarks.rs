//! Loading and header extraction benchmarks.
//!
//! Measures delimited-text parsing, header location and page aggregation
//! over generated price lists.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gabarito::input::{delimited, Sheet};
use gabarito::{Loader, PageManager, Resolver};

/// Generate a cost list with two title lines above the header.
fn generate_price_list(rows: usize, delimiter: char) -> String {
    let mut data = String::new();
    data.push_str(&format!("Tabela de precos{}\n", delimiter));
    data.push_str(&format!("Emitida em 2024-03-01{}\n", delimiter));

    let header = ["CODIGO", "DESCRICAO", "COR", "TAMANHO", "CUSTO", "MARCA"];
    data.push_str(&header.join(&delimiter.to_string()));
    data.push('\n');

    let colors = ["AZUL", "BRANCO", "PRETO", "VERDE"];
    let sizes = ["P", "M", "G", "GG"];

    for row in 0..rows {
        let fields = [
            format!("SKU{:06}", row),
            format!("\"Produto {}{} linha\"", row, delimiter),
            colors[row % colors.len()].to_string(),
            sizes[row % sizes.len()].to_string(),
            format!("{}.{:02}", 10 + row % 90, row % 100),
            "LUI HOME".to_string(),
        ];
        data.push_str(&fields.join(&delimiter.to_string()));
        data.push('\n');
    }

    data
}

fn generate_sheet(name: &str, rows: usize) -> Sheet {
    let mut grid = vec![vec!["Relatorio".to_string()], Vec::new()];
    grid.push(
        ["CODIGO", "COR", "CUSTO"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );
    for row in 0..rows {
        grid.push(vec![
            format!("SKU{:06}", row),
            if row % 2 == 0 { "AZUL" } else { "PRETO" }.to_string(),
            format!("{}", row % 500),
        ]);
    }
    Sheet::from_rows(name, grid)
}

fn bench_parse_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_text");

    for rows in [100, 1_000, 10_000].iter() {
        for delimiter in [',', ';'] {
            let data = generate_price_list(*rows, delimiter);
            group.throughput(Throughput::Bytes(data.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("delimiter_{}", delimiter), rows),
                &data,
                |b, data| b.iter(|| black_box(delimited::parse_text(data, None).unwrap())),
            );
        }
    }

    group.finish();
}

fn bench_load_and_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_and_extract");
    let loader = Loader::new();
    let resolver = Resolver::new();

    for rows in [100, 1_000, 10_000].iter() {
        let data = generate_price_list(*rows, ';');
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("csv_rows", rows), &data, |b, data| {
            b.iter(|| {
                let workbook = loader.load_bytes("custo.csv", data.as_bytes()).unwrap();
                black_box(resolver.extract_table(&workbook, 0, "A3", None).unwrap())
            })
        });
    }

    group.finish();
}

/// Header search alone, with and without a stop row.
fn bench_header_resolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_resolution");
    let resolver = Resolver::new();
    let sheet = generate_sheet("Plan1", 5_000);

    group.bench_function("columns_at_data_row", |b| {
        b.iter(|| black_box(resolver.columns(&sheet, "A3").unwrap()))
    });
    group.bench_function("extract_full", |b| {
        b.iter(|| black_box(resolver.extract(&sheet, "A3", None).unwrap()))
    });
    group.bench_function("extract_stop_row", |b| {
        b.iter(|| black_box(resolver.extract(&sheet, "A3", Some(500)).unwrap()))
    });

    group.finish();
}

fn bench_page_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("page_aggregation");
    group.sample_size(20);

    let loader = Loader::new();
    let base = loader
        .load_bytes("pages.csv", generate_price_list(2_000, ';').as_bytes())
        .unwrap();

    for pages in [1usize, 4, 8].iter() {
        let sheets: Vec<Sheet> = (0..*pages)
            .map(|i| generate_sheet(&format!("Plan{}", i + 1), 2_000))
            .collect();
        let workbook = gabarito::Workbook::new(sheets, base.metadata.clone());

        group.bench_with_input(BenchmarkId::new("approved_pages", pages), &workbook, |b, wb| {
            b.iter(|| {
                let mut manager = PageManager::new(wb);
                for index in 0..wb.sheets.len() {
                    manager.configure_page(index).unwrap();
                    manager.set_start_cell("A3").unwrap();
                    manager.approve().unwrap();
                }
                black_box(manager.aggregate())
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_text,
    bench_load_and_extract,
    bench_header_resolution,
    bench_page_aggregation,
);
criterion_main!(benches);
