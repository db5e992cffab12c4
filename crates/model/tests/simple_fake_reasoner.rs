use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::{poll_fn, ready};
use std::pin::{Pin, pin};
use std::task::{self, Poll, ready};
use std::time::Duration;

use syllabi_agent_model::{
    ChatMessage, ErrorKind, Reasoner, ReasonerError, ReasonerRequest,
    ReasonerResponse, ResponseEvent,
};
use tokio::time::{Sleep, sleep};

#[derive(Debug)]
struct FakeReasonerError(ErrorKind);

impl Display for FakeReasonerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeReasonerError {}

impl ReasonerError for FakeReasonerError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

#[derive(Debug)]
struct FakeResponse {
    fake_items: VecDeque<String>,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl FakeResponse {
    fn new(input: &str) -> Self {
        let fake_items = format!("You asked about {input}")
            .split(" ")
            .map(ToString::to_string)
            .collect();
        Self {
            fake_items,
            sleep: None,
        }
    }
}

impl ReasonerResponse for FakeResponse {
    type Error = FakeReasonerError;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ResponseEvent>, Self::Error>> {
        // SAFETY: This type does not require to be pinned.
        let this = unsafe { self.get_unchecked_mut() };
        if let Some(sleep) = &mut this.sleep {
            let sleep = sleep.as_mut();
            ready!(sleep.poll(cx));
            this.sleep = None;

            if let Some(mut this_item) = this.fake_items.pop_front() {
                let need_space = !this.fake_items.is_empty();
                if need_space {
                    this_item.push(' ');
                }
                return Poll::Ready(Ok(Some(ResponseEvent::MessageDelta(
                    this_item,
                ))));
            }

            return Poll::Ready(Ok(None));
        }
        this.sleep = Some(Box::pin(sleep(Duration::from_millis(1))));
        Pin::new(this).poll_next_event(cx)
    }
}

struct FakeReasoner;

impl Reasoner for FakeReasoner {
    type Error = FakeReasonerError;
    type Response = FakeResponse;

    fn send_request(
        &self,
        req: &ReasonerRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let Some(ChatMessage::User(input)) = req.messages.last() else {
            return ready(Err(FakeReasonerError(ErrorKind::Other)));
        };
        ready(Ok(FakeResponse::new(input)))
    }
}

#[tokio::test]
async fn test_streamed_fragments_concatenate() {
    let reasoner = FakeReasoner;
    let req = ReasonerRequest {
        messages: vec![
            ChatMessage::System("You are a helpful assistant.".to_owned()),
            ChatMessage::User("CS101".to_owned()),
        ],
        tools: vec![],
    };

    let resp = reasoner.send_request(&req).await.unwrap();
    let mut resp = pin!(resp);
    let mut answer = String::new();
    loop {
        let event = poll_fn(|cx| resp.as_mut().poll_next_event(cx))
            .await
            .unwrap();
        let Some(event) = event else {
            break;
        };
        if let ResponseEvent::MessageDelta(delta) = event {
            answer.push_str(&delta);
        }
    }
    assert_eq!(answer, "You asked about CS101");
}
