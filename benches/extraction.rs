use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use histali::{build_catalog, extract, get_tables, tokenize, Config};

// ---------------------------------------------------------------------------
// HTML fixtures
// ---------------------------------------------------------------------------

const SUBCATEGORIES: &[&str] = &["Vajcia", "Ryby", "Zelenina", "Ovocie", "Koreniny"];
const HEADERS: &[&str] = &["0", "1 L", "2 H", "3 H! A", "?"];

/// A pdftohtml-like page list with `n` food records and periodic page furniture.
fn foodlist_html(n: usize) -> String {
    let mut s = String::from(
        "<!DOCTYPE html><html><head><title>foodlist</title></head><body>\n\
         <a name=\"1\"></a>Zoznam kompatibilných potravín SIGHI<br/>\n\
         <b>Živočíšne&#160;potraviny</b><br/>\n",
    );
    for i in 0..n {
        if i % 25 == 0 {
            let sub = SUBCATEGORIES[(i / 25) % SUBCATEGORIES.len()];
            s.push_str(&format!("<b>{sub}</b><br/>\n"));
        }
        if i % 40 == 0 {
            s.push_str("<hr/>\n<a name=\"p\"></a>www.histaminintoleranz.ch<br/>\n");
        }
        let header = HEADERS[i % HEADERS.len()];
        s.push_str(&format!("<b>{header}</b><br/>\npotravina číslo {i}<br/>\n"));
        if i % 3 == 0 {
            s.push_str("Poznámka k položke, ktorá sa ťahá cez riadok.<br/>\n");
        }
    }
    s.push_str("</body></html>");
    s
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Tokenize + state machine at three document sizes.
fn bench_extract(c: &mut Criterion) {
    let tables = get_tables("sk").unwrap();
    let config = Config::default().with_report_incomplete(false);

    let inputs: &[(&str, String)] = &[
        ("small", foodlist_html(50)),
        ("medium", foodlist_html(500)),
        ("large", foodlist_html(5000)),
    ];

    let mut group = c.benchmark_group("extract");
    for (id, html) in inputs {
        group.bench_with_input(BenchmarkId::from_parameter(id), html, |b, html| {
            b.iter(|| extract(black_box(html), black_box(&tables), black_box(&config)))
        });
    }
    group.finish();
}

/// The stages in isolation on the medium document.
fn bench_stages(c: &mut Criterion) {
    let html = foodlist_html(500);
    let tables = get_tables("sk").unwrap();
    let config = Config::default();

    let mut group = c.benchmark_group("stages");

    group.bench_function("get_tables", |b| b.iter(|| get_tables(black_box("sk")).unwrap()));

    group.bench_function("tokenize", |b| b.iter(|| tokenize(black_box(&html))));

    let tokens = tokenize(&html);
    group.bench_function("extract_records", |b| {
        b.iter(|| histali::extract_records(black_box(&tokens), black_box(&tables), black_box(&config)))
    });

    let records = extract(&html, &tables, &config).unwrap().records;
    group.bench_function("build_catalog", |b| {
        b.iter(|| build_catalog(black_box(records.clone()), black_box(&tables)))
    });

    group.finish();
}

criterion_group!(benches, bench_extract, bench_stages);
criterion_main!(benches);
