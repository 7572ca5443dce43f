mod yahoo;

pub use yahoo::YahooChartAdapter;
