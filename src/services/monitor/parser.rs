use crate::services::monitor::types::{HomeworkVerdict, MonitorError, StatusReport};

/// Turn a status report into the text sent to the recipient.
///
/// Returns `Ok(None)` when the report holds no homework (nothing is under review),
/// otherwise describes the first, most recent, record.
pub fn parse_status(report: &StatusReport) -> Result<Option<String>, MonitorError> {
    let Some(homework) = report.homeworks.first() else {
        return Ok(None);
    };

    let status = homework
        .status
        .as_deref()
        .ok_or(MonitorError::MissingField("status"))?;
    let homework_name = homework
        .homework_name
        .as_deref()
        .ok_or(MonitorError::MissingField("homework_name"))?;

    let verdict: HomeworkVerdict = status.parse()?;

    Ok(Some(format!(
        "Изменился статус проверки работы \"{}\". {}",
        homework_name,
        verdict.description()
    )))
}
