use crate::kernel::profile::profile;
use crate::kernel::record::Domain;
use crate::kernel::state::SessionStats;

use super::feed::FeedItem;

/// Everything the operator sees goes through here.
pub trait Presenter: Send {
    fn header(&mut self, domain: Domain, stats: SessionStats);
    fn feed(&mut self, item: &FeedItem);
    fn agent(&mut self, entry: &str);
    /// Alert for a control request the backend did not take.
    fn notice(&mut self, text: &str);
}

/// Plain stdout presentation. Logs go to stderr through tracing, so stdout
/// carries only dashboard content.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleRenderer;

impl Presenter for ConsoleRenderer {
    fn header(&mut self, domain: Domain, stats: SessionStats) {
        let p = profile(domain);
        println!("==== {} ====", p.display.title);
        println!("{}", p.display.subtitle);
        println!(
            "[{}] anomalies: {} | rule: {} = {}",
            p.display.primary_stat, stats.anomalies, p.rule.title, p.rule.default_value
        );
    }

    fn feed(&mut self, item: &FeedItem) {
        println!("{}", item);
    }

    fn agent(&mut self, entry: &str) {
        println!("        {}", entry);
    }

    fn notice(&mut self, text: &str) {
        println!("!!!! {} !!!!", text);
    }
}
