//! Static guide text served by the catalog.
//!
//! Entries are (section, topic, title, body). The body text is domain
//! data; nothing here affects how registration or dispatch works.

pub(super) const GUIDE_DOCS: &[(&str, &str, &str, &str)] = &[
    (
        "concepts",
        "overview",
        "MCP overview",
        "MCP (Model Context Protocol) is a standardized protocol that lets \
applications provide context to LLMs in a uniform way, separating the \
concern of supplying context from the LLM interaction itself.\n\n\
Core capabilities:\n\
- Build clients that can connect to any MCP server\n\
- Build servers that expose resources, prompts, and tools\n\
- Use standard transports such as stdio, SSE, and streamable HTTP\n\
- Handle all MCP protocol messages and lifecycle events\n",
    ),
    (
        "concepts",
        "server",
        "Servers",
        "The server is the core interface to the MCP protocol. It handles \
connection management, protocol compliance, and message routing.\n\n\
A server is created with a name, declares its capabilities during the \
initialize handshake, and then answers discovery and invocation \
requests for everything registered on it.\n",
    ),
    (
        "concepts",
        "resources",
        "Resources",
        "Resources expose data to LLMs. They are similar to GET endpoints in \
a REST API: they provide content but should not perform significant \
computation or have side effects.\n\n\
A resource is addressed by a URI such as `config://app`. Resource \
identifiers may be templated, e.g. `users://{user_id}/profile`, in \
which case the variable segments are extracted from the request URI \
and passed to the provider.\n",
    ),
    (
        "concepts",
        "tools",
        "Tools",
        "Tools let LLMs take actions through the server. Unlike resources, \
tools are expected to perform computation and may have side effects.\n\n\
Each tool declares a name, a description, and an input schema derived \
from its parameters, so a client can construct a valid call without \
trial and error.\n",
    ),
    (
        "concepts",
        "prompts",
        "Prompts",
        "Prompts are reusable templates that help LLMs interact with the \
server effectively. A prompt has a name and optional arguments; \
getting a prompt renders its template into one or more messages the \
client can feed to the model.\n",
    ),
    (
        "setup",
        "installation",
        "Installation",
        "Add the server to your project as a dependency, or install the \
standalone binary. The server has no external services to set up: it \
reads requests on stdin and writes responses on stdout, so any \
MCP-aware client can launch it directly.\n",
    ),
    (
        "setup",
        "running",
        "Running the server",
        "Run the binary directly for a stdio session, or configure it as a \
server entry in your MCP client (for example a desktop assistant's \
server list). Logs go to stderr; stdout carries only protocol \
messages. Set RUST_LOG to adjust log verbosity.\n",
    ),
    (
        "examples",
        "echo_server",
        "Echo server example",
        "A minimal server showing a resource, a tool, and a prompt:\n\n\
- resource `echo://{message}` returns \"Resource echo: <message>\"\n\
- tool `echo_tool(message)` returns \"Tool echo: <message>\"\n\
- prompt `echo_prompt(message)` renders \"Please process this \
message: <message>\"\n\n\
The three registrations share one handler shape: bound arguments in, \
text out.\n",
    ),
    (
        "examples",
        "sqlite_explorer",
        "SQLite explorer example",
        "A more involved example showing database integration:\n\n\
- resource `schema://main` returns the database schema, read from a \
connection held in the shared lifecycle context\n\
- tool `query_data(sql)` executes a query and returns the rows as \
text, reporting failures as tool errors rather than crashing the \
server\n",
    ),
    (
        "advanced",
        "low_level_server",
        "Low-level server usage",
        "For full control you can drop below the declaration layer and drive \
the registry and dispatcher directly: register handlers at startup, \
then feed identifiers and arguments to the dispatcher yourself.\n\n\
Lifecycle state (a database handle, a document store) is built before \
the first request, handed to every handler by reference, and released \
at shutdown.\n",
    ),
    (
        "advanced",
        "clients",
        "Client usage",
        "An MCP client connects over a transport, performs the initialize \
handshake, then discovers capabilities with resources/list, \
tools/list, and prompts/list before reading resources, calling tools, \
or getting prompts.\n\n\
The listings carry parameter names, types, and required flags, so a \
well-behaved client never has to guess an argument shape.\n",
    ),
];
