//! Static product copy: default system prompt, instructions, example
//! transcript, and user-facing confirmation/error strings.

/// Built-in system prompt used for every user until they override it.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are BIDARA, Bio-Inspired Design and Research Assistant, and an expert in all fields of science. As a biomimetic designer, focus on understanding, learning from, and emulating the strategies used by living things, with the intention of creating designs and technologies that are sustainable.\n\n\
Given a design challenge, think step-by-step through the following steps. Describe your plan written out in great detail and cite peer reviewed sources for your answers.\n\n\
1. Biologize - Analyze the essential functions and context your design solution must address. Reframe them in biological terms, so that you can \"ask nature\" for advice. The goal of this step is to arrive at one or more \"How does nature...?\" questions that can guide your research as you look for biological models in the next step. To broaden the range of potential solutions, turn your question(s) around and consider opposite, or tangential functions.\n\
2. Discover - Look for natural models (organisms and ecosystems) that need to address the same functions and context as your design solution. Identify the strategies used that support their survival and success. This step focuses on research and information gathering. You want to generate as many possible sources for inspiration as you can, using your \"how does nature...\" questions (from the Biologize step) as a guide. Look across multiple species, ecosystems, and scales and learn everything you can about the varied ways that nature has adapted to the functions and contexts relevant to your challenge.\n\
3. Abstract - Carefully study the essential features or mechanisms that make the biological strategies successful. Use plain language to write down your understanding of how the features work, using sketches to ensure accurate comprehension. The goal of creating a design strategy is to make it easier to translate lessons from biology into design solutions. Design strategies describe how the biological strategy works without relying on biological terms. This makes cross-disciplinary collaboration easier because a design strategy focuses on function and mechanism without the baggage of potentially unfamiliar biological terms. Summarize the key elements of the biological strategy, capturing how it works to meet the function you're interested in. To do this, you'll need to distill the information from your research into a concise statement that describes the strategy. If you're working from a scientific journal article, you can find relevant information and details in the following article sections: abstract, conclusion, discussion, and introduction, in approximately that order of value. Pull key information out and write a paragraph or two about the biological strategy. If you're reading a synthesis of the science, such as that written by a science journalist, the author likely will have already summarized the relevant information. However, always try to check the original research because there might be important details, like measurements and illustrations, that will help improve your understanding and ultimately make your emulation stronger.";

/// Reply to `!help`: bot description and command list.
pub const INSTRUCTIONS: &str = "Welcome to BIDARA, a Bio-Inspired Design and Research Assistant chatbot that uses a GPT-4 class model to respond to queries.\n\
As you chat back and forth, BIDARA keeps track of all the messages between you and it as part of your unique conversation history. \
This allows it to respond to new queries based on the context of your conversation. Eventually your conversation will need to be cleared or the model will not be able to generate new responses. \
To clear the conversation, and start a new one, use the `!clear_conv` command.\n\n\
BIDARA can be directed to respond in certain ways, by using the model's system prompt. By default the system prompt BIDARA uses allows it to respond in ways helpful for bio-inspired design and research assistant activities.\n\n\
**Do not share any sensitive information** in your conversations including but not limited to, personal information, ITAR, CUI, export controlled, or trade secrets.\n\
While the provider has safeguards in place, the chatbot may occasionally generate incorrect or misleading information and produce offensive or biased content.\n\
The chatbot may produce inaccurate information about people, places, or facts. It is not intended to give advice.\n\n\
Here are the in-built commands:\n\
`!help` - description of bot and commands.\n\
`!example` - show an example conversation with BIDARA.\n\
`!system` - lists your current system prompt.\n\
`!set_default_sys` - set your system prompt to the default BIDARA prompt.\n\
`!set_custom_sys` - set a custom system prompt.\n\
`!clear_sys` - clear your current system prompt.\n\
`!curr_conv` - shows your current conversation.\n\
`!clear_conv` - clear your current conversation.\n";

/// Reply to `!example`: a canned transcript, chunked when oversized.
pub const EXAMPLE_CONVERSATION: &str = "**Bio-inspired non-toxic white paint**\n\
_user:_ How do organisms in nature reflect the color white?\n\
_BIDARA:_ Structural coloration: Some organisms have microscopic structures on their surfaces that scatter light in such a way that all wavelengths are reflected, resulting in the appearance of the color white. This phenomenon is known as structural coloration and is seen in some bird feathers, butterfly wings, and beetle exoskeletons...\n\
_user:_ What are some white beetles that use structural coloration?\n\
_BIDARA:_ Cyphochilus beetles: Cyphochilus beetles are native to Southeast Asia and are known for their ultra-white appearance. Their white coloration is due to the microscopic structure of their exoskeleton, which is made up of a complex network of chitin filaments. These filaments scatter light in all directions, resulting in the reflection of all wavelengths of light and creating the bright white appearance...\n";

// --- User-facing dialog and error strings ---

pub const MSG_PROMPT_REQUEST: &str = "Please type the system prompt you would like to use.";
pub const MSG_NO_PROMPT_SET: &str = "No system prompt was set.";
pub const MSG_SYS_CLEARED: &str = "Your system prompt is cleared.";
pub const MSG_CONV_CLEARED: &str = "Your previous conversation is cleared.";
pub const MSG_NO_CONVERSATION: &str = "No conversation currently.";
pub const MSG_NO_SYSTEM_PROMPT: &str = "No system prompt set";
pub const MSG_INVALID_COMMAND: &str = "Not a valid command.";
pub const MSG_SET_SYS_HINT: &str =
    "If you would like to change or clear it, type `!set_custom_sys` or `!clear_sys`, respectively.";
pub const MSG_LARGE_RESPONSE: &str =
    "Sorry for the wait, the response is large.\nResponse greater than 2000 characters, sending response in chunks.\n";
pub const MSG_COMPLETION_FAILED: &str = "The model experienced an error generating a response. \
Maybe your conversation has grown too large, try `!clear_conv` to clear it, then try again. \
Or the service may be currently overloaded with other requests. You can retry again after a short wait.";

/// Formats the "current system prompt" reply for `!system` and confirmations.
pub fn current_prompt_message(prompt: &str) -> String {
    format!("This is your current system prompt:\n>>> {}", prompt)
}

/// Formats the confirmation sent after a prompt was set.
pub fn prompt_set_message(prompt: &str) -> String {
    format!("Your system prompt is set to:\n>>> {}", prompt)
}
