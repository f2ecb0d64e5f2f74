/// Named counters used to mint human readable ids such as `PROJECT07`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    User,
    Project,
    ServiceRequest,
    Message,
}

impl Sequence {
    pub fn counter_name(self) -> &'static str {
        match self {
            Sequence::User => "user_counter",
            Sequence::Project => "project_counter",
            Sequence::ServiceRequest => "service_request_counter",
            Sequence::Message => "message_counter",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Sequence::User => "USER",
            Sequence::Project => "PROJECT",
            Sequence::ServiceRequest => "SERVICE",
            Sequence::Message => "MESSAGE",
        }
    }

    /// Zero-padded to two digits, unbounded beyond that.
    pub fn format_id(self, value: i64) -> String {
        format!("{}{:02}", self.prefix(), value)
    }
}
