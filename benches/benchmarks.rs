// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use oscr::{
    ContributionsByDate, FeaturedRepositories, RawPullRequest, RenderConfig, normalize_record,
    parse_sheet, render_markdown,
};

fn build_contributions(count: usize,) -> ContributionsByDate
{
    (0..count)
        .map(|index| {
            let repository = format!("owner{}/repo{}", index % 7, index % 13);
            let raw = RawPullRequest {
                title:      format!("fix: issue {index}"),
                url:        format!("https://github.com/{repository}/pull/{}", index + 1),
                number:     index as u64 + 1,
                state:      if index % 3 == 0 { "MERGED" } else { "OPEN" }.to_owned(),
                is_draft:   index % 11 == 0,
                created_at: format!("20{:02}-{:02}-15T12:00:00Z", 20 + index % 5, 1 + index % 12),
                repository: Some(repository,),
            };
            normalize_record(raw, index, None,).expect("valid record",)
        },)
        .collect()
}

fn benchmark_render_small(c: &mut Criterion,)
{
    let contributions = build_contributions(25,);
    let featured = FeaturedRepositories::new();
    let config = RenderConfig::default();

    c.bench_function("render_markdown_small", |b| {
        b.iter(|| render_markdown(black_box(&contributions,), &featured, &config,),)
    },);
}

fn benchmark_render_large(c: &mut Criterion,)
{
    let contributions = build_contributions(2_000,);
    let mut featured = FeaturedRepositories::new();
    for index in 0..7 {
        featured.record(&format!("owner{index}/repo{index}"), Some(index as f64,),);
    }
    let config = RenderConfig::default();

    c.bench_function("render_markdown_large", |b| {
        b.iter(|| {
            let document = render_markdown(black_box(&contributions,), &featured, &config,);
            black_box(document.len(),)
        },)
    },);
}

fn benchmark_parse_sheet(c: &mut Criterion,)
{
    let mut csv = String::from("URL,Featured,FeaturedOrder,Status,Value\n",);
    for index in 0..500 {
        csv.push_str(&format!(
            "https://github.com/owner{}/repo/pull/{},{},{},OPEN,1\n",
            index % 17,
            index + 1,
            if index % 5 == 0 { "YES" } else { "" },
            index % 9
        ),);
    }

    c.bench_function("parse_sheet_500_rows", |b| {
        b.iter(|| {
            let sheet = parse_sheet(black_box(&csv,),).expect("parse failed",);
            black_box(sheet.rows.len(),)
        },)
    },);
}

criterion_group!(benches, benchmark_render_small, benchmark_render_large, benchmark_parse_sheet);
criterion_main!(benches);
