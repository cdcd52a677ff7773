mod common;

use chrono::FixedOffset;
use common::{many_repos, repo, utc};
use github_repo_browser::error::RepoBrowserError;
use github_repo_browser::filter::{
    filter_repos,
    language_matches,
    parse_language,
    Filters,
    StarFilter,
    YearFilter,
};
use github_repo_browser::models::{Repository, Zone};

fn sample() -> Vec<Repository> {
    vec![
        repo(1, 500, 0, Some("JavaScript"), "2017-03-03T10:00:00Z"),
        repo(2, 400, 1, Some("Python"), "2019-06-06T10:00:00Z"),
        repo(3, 300, 3, None, "2023-12-31T23:59:59Z"),
        repo(4, 200, 4, Some("javascript"), "2023-01-15T08:00:00Z"),
        repo(5, 100, 12, Some("HTML"), "2024-02-02T00:00:00Z"),
    ]
}

fn ids(repos: &[&Repository]) -> Vec<u64> {
    repos.iter().map(|r| r.id).collect()
}

#[test]
fn test_no_filters_pass_everything() {
    let repos = sample();
    let filtered = filter_repos(&repos, &Filters::default(), &utc());
    assert_eq!(ids(&filtered), vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_star_filter_exact_and_four_or_more() {
    let repos = sample();

    let exactly_three = Filters { stars: StarFilter::Exactly(3), ..Default::default() };
    assert_eq!(ids(&filter_repos(&repos, &exactly_three, &utc())), vec![3]);

    let four_or_more = Filters { stars: StarFilter::AtLeastFour, ..Default::default() };
    assert_eq!(ids(&filter_repos(&repos, &four_or_more, &utc())), vec![4, 5]);
}

#[test]
fn test_four_or_more_boundary() {
    assert!(StarFilter::AtLeastFour.matches(&repo(1, 1, 4, None, "2020-01-01")));
    assert!(!StarFilter::AtLeastFour.matches(&repo(2, 1, 3, None, "2020-01-01")));
}

#[test]
fn test_language_filter_is_case_insensitive() {
    let repos = sample();
    let filters = Filters { language: Some("javascript".to_string()), ..Default::default() };
    assert_eq!(ids(&filter_repos(&repos, &filters, &utc())), vec![1, 4]);

    let upper = Filters { language: Some("PYTHON".to_string()), ..Default::default() };
    assert_eq!(ids(&filter_repos(&repos, &upper, &utc())), vec![2]);
}

#[test]
fn test_language_filter_skips_missing_language() {
    let no_language = repo(9, 1, 0, None, "2020-01-01");
    assert!(language_matches(None, &no_language));
    assert!(!language_matches(Some("Rust"), &no_language));
}

#[test]
fn test_year_filter_uses_given_zone() {
    let late = repo(3, 1, 0, None, "2023-12-31T23:59:59Z");

    assert!(YearFilter::Year(2023).matches(&late, &utc()));
    assert!(!YearFilter::Year(2024).matches(&late, &utc()));

    let east = Zone::Fixed(FixedOffset::east_opt(3600).unwrap());
    assert!(YearFilter::Year(2024).matches(&late, &east));

    let west = Zone::Fixed(FixedOffset::west_opt(5 * 3600).unwrap());
    assert!(YearFilter::Year(2023).matches(&late, &west));
}

#[test]
fn test_filters_combine_with_and() {
    let repos = sample();
    let filters = Filters {
        stars: StarFilter::AtLeastFour,
        language: Some("JavaScript".to_string()),
        year: YearFilter::Year(2023),
    };
    assert_eq!(ids(&filter_repos(&repos, &filters, &utc())), vec![4]);

    let impossible = Filters { year: YearFilter::Year(2017), ..filters };
    assert!(filter_repos(&repos, &impossible, &utc()).is_empty());
}

#[test]
fn test_filtered_is_subset_satisfying_every_predicate() {
    let repos = many_repos(40);
    let zone = utc();
    let star_options = [
        StarFilter::Any,
        StarFilter::Exactly(1),
        StarFilter::Exactly(3),
        StarFilter::AtLeastFour,
    ];
    let language_options = [None, Some("rust".to_string()), Some("Go".to_string())];
    let year_options = [YearFilter::Any, YearFilter::Year(2022), YearFilter::Year(2019)];

    for stars in star_options {
        for language in &language_options {
            for year in year_options {
                let filters = Filters { stars, language: language.clone(), year };
                let filtered = filter_repos(&repos, &filters, &zone);

                for r in &filtered {
                    assert!(repos.iter().any(|orig| orig == *r));
                    assert!(stars.matches(r));
                    assert!(language_matches(language.as_deref(), r));
                    assert!(year.matches(r, &zone));
                }

                let expected = repos.iter().filter(|r| filters.matches(r, &zone)).count();
                assert_eq!(filtered.len(), expected);

                // Filtering the result again changes nothing
                let owned: Vec<Repository> = filtered.iter().map(|r| (*r).clone()).collect();
                let again = filter_repos(&owned, &filters, &zone);
                assert_eq!(ids(&again), ids(&filtered));
            }
        }
    }
}

#[test]
fn test_parse_star_filter() {
    assert_eq!("".parse::<StarFilter>().unwrap(), StarFilter::Any);
    assert_eq!("any".parse::<StarFilter>().unwrap(), StarFilter::Any);
    assert_eq!("2".parse::<StarFilter>().unwrap(), StarFilter::Exactly(2));
    assert_eq!("+4".parse::<StarFilter>().unwrap(), StarFilter::AtLeastFour);
    assert_eq!("4+".parse::<StarFilter>().unwrap(), StarFilter::AtLeastFour);
    assert_eq!("4-or-more".parse::<StarFilter>().unwrap(), StarFilter::AtLeastFour);
    assert!(matches!(
        "lots".parse::<StarFilter>(),
        Err(RepoBrowserError::InvalidFilter(_))
    ));

    assert_eq!(StarFilter::AtLeastFour.to_string(), "+4");
    assert_eq!(StarFilter::Exactly(2).to_string(), "2");
}

#[test]
fn test_parse_year_and_language() {
    assert_eq!("2021".parse::<YearFilter>().unwrap(), YearFilter::Year(2021));
    assert_eq!(" ".parse::<YearFilter>().unwrap(), YearFilter::Any);
    assert!("twenty".parse::<YearFilter>().is_err());

    assert_eq!(parse_language("  VUE "), Some("VUE".to_string()));
    assert_eq!(parse_language("Any"), None);
    assert_eq!(parse_language(""), None);
}

#[test]
fn test_filters_is_empty() {
    assert!(Filters::default().is_empty());
    let filters = Filters { year: YearFilter::Year(2020), ..Default::default() };
    assert!(!filters.is_empty());
}
