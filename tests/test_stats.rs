// Statistic tests
// Author: Gabriel Demetrios Lafis

use rust_streaming_stats::{
    data::{ResultLine, ValueSet},
    processing::{
        mean, median, min_max, normalize, percentile, skewness, std_dev, ProcessingError, Statistic,
        StatsProcessor, ValueFormat,
    },
};

fn compute(statistic: Statistic, values: &[f64]) -> ResultLine {
    StatsProcessor::new(statistic)
        .compute(&ValueSet::from(values.to_vec()))
        .unwrap()
}

#[test]
fn test_median_odd_and_even() {
    assert_eq!(median(&[3.0, 1.0, 2.0]).unwrap(), 2.0);
    assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
    assert_eq!(median(&[42.0]).unwrap(), 42.0);
}

#[test]
fn test_std_dev_is_population() {
    // population variance of 2,4,4,4,5,5,7,9 is 4
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert_eq!(std_dev(&values).unwrap(), 2.0);
    assert_eq!(std_dev(&[5.0, 5.0, 5.0]).unwrap(), 0.0);
    assert_eq!(std_dev(&[0.1, 0.1, 0.1]).unwrap(), 0.0);
    assert!(std_dev(&[1.0, 2.0]).unwrap() > 0.0);
}

#[test]
fn test_min_max_and_normalize() {
    assert_eq!(min_max(&[20.0, 10.0, 30.0]).unwrap(), (10.0, 30.0));
    assert_eq!(normalize(&[10.0, 20.0, 30.0]).unwrap(), vec![0.0, 0.5, 1.0]);
    assert_eq!(normalize(&[4.0, 4.0]).unwrap(), vec![0.0, 0.0]);
}

#[test]
fn test_percentile_nearest_rank() {
    let values: Vec<f64> = (1..=10).map(f64::from).rev().collect();
    assert_eq!(percentile(&values, 90.0).unwrap(), 9.0);
    assert_eq!(percentile(&values, 100.0).unwrap(), 10.0);
    assert_eq!(percentile(&values, 1.0).unwrap(), 1.0);
    assert_eq!(percentile(&[7.0], 90.0).unwrap(), 7.0);

    let values: Vec<f64> = (1..=30).map(f64::from).collect();
    assert_eq!(percentile(&values, 90.0).unwrap(), 27.0);
}

#[test]
fn test_skewness() {
    assert_eq!(skewness(&[7.0, 7.0, 7.0, 7.0]).unwrap(), 0.0);
    assert!(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap().abs() < 1e-12);
    assert!(skewness(&[1.0, 1.0, 1.0, 10.0]).unwrap() > 0.0);
    assert!(skewness(&[1.0, 10.0, 10.0, 10.0]).unwrap() < 0.0);
}

#[test]
fn test_empty_value_set_is_an_error() {
    for statistic in Statistic::ALL {
        let err = StatsProcessor::new(statistic)
            .compute(&ValueSet::new())
            .unwrap_err();
        assert!(matches!(err, ProcessingError::EmptyValueSet), "{}", statistic);
    }
}

#[test]
fn test_result_lines() {
    assert_eq!(compute(Statistic::Median, &[1.0, 2.0, 3.0, 4.0]).to_string(), "Median\t2.5");
    assert_eq!(compute(Statistic::Median, &[1.0, 2.0, 3.0]).to_string(), "Median\t2");
    assert_eq!(compute(Statistic::StdDev, &[5.0, 5.0, 5.0]).to_string(), "StandardDeviation\t0");
    assert_eq!(compute(Statistic::MinMax, &[10.0, 20.0, 30.0]).to_string(), "MinMax\tmin=10,max=30");
    assert_eq!(
        compute(Statistic::Percentile, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]).to_string(),
        "90thPercentile\t9"
    );
    assert_eq!(compute(Statistic::Skewness, &[7.0, 7.0, 7.0, 7.0]).to_string(), "Skewness\t0");
}

#[test]
fn test_fixed_precision_and_percentile_label() {
    let values = ValueSet::from(vec![1.0, 2.0, 3.0, 4.0]);

    let line = StatsProcessor::new(Statistic::Median)
        .with_format(ValueFormat::Fixed(3))
        .compute(&values)
        .unwrap();
    assert_eq!(line.to_string(), "Median\t2.500");

    let line = StatsProcessor::new(Statistic::MinMax)
        .with_format(ValueFormat::Fixed(1))
        .compute(&values)
        .unwrap();
    assert_eq!(line.value, "min=1.0,max=4.0");

    let processor = StatsProcessor::new(Statistic::Percentile)
        .with_percentile(75.0)
        .unwrap();
    assert_eq!(processor.label(), "75thPercentile");
    assert_eq!(processor.compute(&values).unwrap().value, "3");

    assert!(StatsProcessor::new(Statistic::Percentile).with_percentile(0.0).is_err());
    assert!(StatsProcessor::new(Statistic::Percentile).with_percentile(101.0).is_err());
}

#[test]
fn test_selector_parsing() {
    assert_eq!("MEDIAN".parse::<Statistic>().unwrap(), Statistic::Median);
    assert_eq!("StdDev".parse::<Statistic>().unwrap(), Statistic::StdDev);
    for statistic in Statistic::ALL {
        assert_eq!(statistic.name().parse::<Statistic>().unwrap(), statistic);
    }

    let err = "mode".parse::<Statistic>().unwrap_err();
    assert!(matches!(err, ProcessingError::UnknownStatistic(_)));
    assert!(err.to_string().contains("mode"));
}

#[test]
fn test_compute_is_deterministic() {
    let values = ValueSet::from(vec![3.5, -1.25, 8.0, 0.0, 2.75, 2.75]);

    for statistic in Statistic::ALL {
        let processor = StatsProcessor::new(statistic);
        let first = processor.compute(&values).unwrap();
        let second = processor.compute(&values).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_result_line_extraction() {
    let line = ResultLine::parse("MinMax\tmin=10,max=30\n").unwrap();
    assert_eq!(line.label, "MinMax");
    assert_eq!(line.min_max(), Some((10.0, 30.0)));
    assert_eq!(line.numeric_value(), None);

    let line = ResultLine::parse("Median\t2.5").unwrap();
    assert_eq!(line.numeric_value(), Some(2.5));

    assert!(ResultLine::parse("Median").is_err());
    assert!(ResultLine::parse("a b c").is_err());
}

#[test]
#[allow(overflowing_literals)]
fn test_large_finite_inputs_stay_finite() {
    let line = compute(Statistic::Median, &[1.7e308, 1.7e308]);
    assert_eq!(line.numeric_value(), Some(1.7e308));
    assert_eq!(median(&[-1.7e308, 1.7e308]).unwrap(), 0.0);
    let mid = median(&[1.6e308, 1.8e308]).unwrap();
    assert!((mid / 1.7e308 - 1.0).abs() < 1e-12);

    let sd = std_dev(&[1e308, -1e308]).unwrap();
    assert!(sd.is_finite());
    assert!((sd / 1e308 - 1.0).abs() < 1e-12);

    let skew = skewness(&[1e308, 1.5e308, 1.6e308]).unwrap();
    assert!(skew.is_finite());
    assert!(skew < 0.0);

    let same_shape = skewness(&[1.0, 1.5, 1.6]).unwrap();
    assert!((skew - same_shape).abs() < 1e-9);

    assert_eq!(mean(&[1.7e308, 1.7e308]).unwrap(), 1.7e308);
    assert_eq!(normalize(&[-1.7e308, 0.0, 1.7e308]).unwrap(), vec![0.0, 0.5, 1.0]);

    for statistic in Statistic::ALL {
        let line = compute(statistic, &[1.7e308, -1.7e308, 1.2e308]);
        assert!(!line.value.contains("inf") && !line.value.contains("NaN"), "{}", line);
    }
}

#[test]
fn test_tiny_inputs_keep_precision() {
    let sd = std_dev(&[1e-310, 3e-310]).unwrap();
    assert!(sd > 0.0);
    let mid = median(&[1e-310, 3e-310]).unwrap();
    assert!(mid > 1e-310 && mid < 3e-310);
}
