use crate::protocol::{HttpError, Request};
use crate::response::ResponseParts;
use crate::response::echo::echo_parts;

/// HEAD variant: the headers of the equivalent echo response, no body.
pub struct HeadResponse {
    request: Request,
}

impl HeadResponse {
    pub(crate) fn new(request: Request) -> Self {
        Self { request }
    }

    pub(crate) fn into_parts(self) -> Result<ResponseParts, HttpError> {
        echo_parts(&self.request, false)
    }
}
