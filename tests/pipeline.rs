use price_incidence::data::DataLoader;
use price_incidence::stats::TrendDirection;
use price_incidence::{compute_pipeline, GenderColumn, PipelineOutcome, PipelineResult, Selection};
use std::collections::BTreeSet;
use std::io::Write;
use tempfile::NamedTempFile;

const PRICES: &str = "product ,year, price\n\
A,2020,10\n\
A,2021,12\n\
B,2020,20\n\
B,2021,18\n\
C,2019,7\n\
A,2022,13\n";

const CANCER: &str = "部位 ,年,罹患数(男),罹患数(女),罹患数(総数)\n\
X,2019,95,85,180\n\
X,2020,100,90,190\n\
X,2021,110,95,205\n\
Y,2021,50,40,90\n";

fn write_csv(content: &str) -> NamedTempFile {
    let mut tmp = NamedTempFile::new().unwrap();
    write!(tmp, "{}", content).unwrap();
    tmp
}

fn run(products: &[&str], site: &str, gender: GenderColumn) -> PipelineOutcome {
    run_with(PRICES, CANCER, products, site, gender)
}

fn run_with(
    prices: &str,
    cancer: &str,
    products: &[&str],
    site: &str,
    gender: GenderColumn,
) -> PipelineOutcome {
    let prices = write_csv(prices);
    let cancer = write_csv(cancer);
    let ctx = DataLoader::load(prices.path(), cancer.path()).unwrap();
    compute_pipeline(&ctx, &Selection::new(products.iter().copied(), site, gender)).unwrap()
}

/// Years of the fixture rows whose first field is one of `keys`.
fn fixture_years(csv: &str, keys: &[&str]) -> BTreeSet<i64> {
    csv.lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split(',');
            let key = fields.next()?.trim();
            let year = fields.next()?.trim().parse::<i64>().ok()?;
            keys.contains(&key).then_some(year)
        })
        .collect()
}

fn ready(outcome: PipelineOutcome) -> PipelineResult {
    match outcome {
        PipelineOutcome::Ready(result) => result,
        PipelineOutcome::SelectionRequired => panic!("expected a result"),
    }
}

#[test]
fn test_two_products_from_csv() {
    let result = ready(run(&["A", "B"], "X", GenderColumn::Total));

    assert_eq!(result.joined.len(), 4);
    assert_eq!(result.yearly_totals, vec![(2020, 380), (2021, 410)]);
    assert_eq!(result.headline.map(|h| (h.year, h.value)), Some((2021, 410)));
    assert_eq!(result.incidence_series, vec![(2020, 190), (2021, 205)]);
}

#[test]
fn test_single_product_from_csv() {
    let result = ready(run(&["A"], "X", GenderColumn::Total));

    assert_eq!(result.yearly_totals, vec![(2020, 190), (2021, 205)]);
    assert_eq!(result.trend.direction, TrendDirection::BothRising);
}

#[test]
fn test_joined_years_are_intersection_and_sorted() {
    let products = ["A", "B", "C"];
    let result = ready(run(&products, "X", GenderColumn::Male));

    let price_years = fixture_years(PRICES, &products);
    let cancer_years = fixture_years(CANCER, &["X"]);
    let expected: BTreeSet<i64> = price_years.intersection(&cancer_years).copied().collect();
    assert!(price_years.contains(&2022) && !expected.contains(&2022));

    let joined_years: BTreeSet<i64> = result.joined.iter().map(|r| r.year).collect();
    assert_eq!(joined_years, expected);
    assert!(result.joined.windows(2).all(|w| w[0].year <= w[1].year));
    assert_eq!(result.summary.map(|s| (s.min_year, s.max_year)), Some((2019, 2021)));

    let only_y = ready(run(&products, "Y", GenderColumn::Male));
    let y_years: BTreeSet<i64> = only_y.joined.iter().map(|r| r.year).collect();
    let expected_y: BTreeSet<i64> = price_years
        .intersection(&fixture_years(CANCER, &["Y"]))
        .copied()
        .collect();
    assert_eq!(y_years, expected_y);
}

#[test]
fn test_blank_price_cell_from_csv() {
    let prices = "product,year,price\nA,2019,10\nA,2020,\nA,2021,14\n";
    let cancer = "site,year,incidenceMale,incidenceFemale,incidenceTotal\n\
X,2019,50,40,90\n\
X,2020,55,45,100\n\
X,2021,60,50,110\n";
    let result = ready(run_with(prices, cancer, &["A"], "X", GenderColumn::Total));

    let years: Vec<i64> = result.yearly_mean_price.iter().map(|&(y, _)| y).collect();
    assert_eq!(years, vec![2019, 2020, 2021]);
    assert!(result.yearly_mean_price[1].1.is_nan());
    assert_eq!(result.trend.price_trend, None);
    assert_eq!(result.trend.incidence_trend, Some(10.0));
    assert_eq!(result.trend.direction, TrendDirection::NoClearTrend);
}

#[test]
fn test_empty_selection_from_csv() {
    assert_eq!(
        run(&[], "X", GenderColumn::Total),
        PipelineOutcome::SelectionRequired
    );
}

#[test]
fn test_no_overlap_from_csv() {
    let result = ready(run(&["C"], "Y", GenderColumn::Female));

    assert!(result.is_empty());
    assert!(result.summary.is_none());
    assert!(result.headline.is_none());
    assert_eq!(result.trend.direction, TrendDirection::NoClearTrend);
}
